//! The community array and its labelled CSV form.
//!
//! A [`CommunityMatrix`] is an immutable, row-major grid of community
//! labels. Rows and columns are both addressed through [`Axis`] so the
//! ordering code can treat them symmetrically.

use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::order::Permutation;

/// A community id. Values need not be contiguous or small.
pub type Label = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Label>,
}

impl CommunityMatrix {
    /// Build a matrix from its rows. Every row must have the length of the
    /// first one.
    pub fn from_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[Label]>,
    {
        let mut cells = Vec::new();
        let mut n_rows = 0;
        let mut n_cols = None;
        for (i, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let expected = *n_cols.get_or_insert(row.len());
            if row.len() != expected {
                return Err(Error::RaggedRow {
                    row: i,
                    expected,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
            n_rows += 1;
        }
        Ok(CommunityMatrix {
            rows: n_rows,
            cols: n_cols.unwrap_or(0),
            cells,
        })
    }

    /// Build a matrix from signed cells, rejecting negative labels.
    pub fn from_signed_rows<I, R>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[i64]>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(r, row)| {
                row.as_ref()
                    .iter()
                    .enumerate()
                    .map(|(c, &v)| {
                        Label::try_from(v).map_err(|_| Error::InvalidLabel {
                            row: r,
                            col: c,
                            value: v.to_string(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows)
    }

    /// A matrix with `cols` columns and no rows.
    pub fn without_rows(cols: usize) -> Self {
        CommunityMatrix {
            rows: 0,
            cols,
            cells: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len_of(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.cols,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Label> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Label] {
        &self.cells
    }

    /// Cells of one row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`; use [`get`](Self::get) for a checked lookup.
    pub fn row(&self, row: usize) -> &[Label] {
        assert!(row < self.rows, "row {row} out of range for {} rows", self.rows);
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// The cells of row or column `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len_of(axis)`.
    pub fn lane(&self, axis: Axis, index: usize) -> impl Iterator<Item = Label> + '_ {
        let n = self.len_of(axis);
        assert!(index < n, "{axis} {index} out of range for {n} {axis}s");
        let (len, stride, offset) = match axis {
            Axis::Row => (self.cols, 1, index * self.cols),
            Axis::Column => (self.rows, self.cols, index),
        };
        (0..len).map(move |k| self.cells[offset + k * stride])
    }

    /// The distinct labels present, ascending.
    pub fn labels(&self) -> BTreeSet<Label> {
        self.cells.iter().copied().collect()
    }

    pub fn to_rows(&self) -> Vec<Vec<Label>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    /// A copy with rows and columns shown in the given orders.
    pub fn permuted(&self, rows: &Permutation, cols: &Permutation) -> Self {
        debug_assert_eq!(rows.len(), self.rows);
        debug_assert_eq!(cols.len(), self.cols);
        let cells = rows
            .iter()
            .flat_map(|r| cols.iter().map(move |c| self.cells[r * self.cols + c]))
            .collect();
        CommunityMatrix {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Check that the name lists fit this matrix.
    pub fn check_names<S: AsRef<str>>(&self, rownames: &[S], colnames: &[S]) -> Result<()> {
        for (axis, found) in [(Axis::Row, rownames.len()), (Axis::Column, colnames.len())] {
            let expected = self.len_of(axis);
            if found != expected {
                return Err(Error::ShapeMismatch {
                    axis,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

/// Largest float below which every integer is represented exactly (2^53).
const EXACT_FLOAT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Parse one cell. Integer-valued decimals such as `3.0` are accepted as
/// long as they are exact in an `f64`.
pub fn parse_label(row: usize, col: usize, raw: &str) -> Result<Label> {
    let raw = raw.trim();
    if let Ok(label) = raw.parse::<Label>() {
        return Ok(label);
    }
    let invalid = || Error::InvalidLabel {
        row,
        col,
        value: raw.to_string(),
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < EXACT_FLOAT_LIMIT => {
            Ok(v as Label)
        }
        _ => Err(invalid()),
    }
}

/// A matrix together with its row and column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelledMatrix {
    pub matrix: CommunityMatrix,
    pub row_names: Vec<String>,
    pub col_names: Vec<String>,
}

impl LabelledMatrix {
    /// Read a labelled CSV: a header of column names (its first field is a
    /// corner label), then one record per row, row name first.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let col_names: Vec<String> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();

        let mut row_names = Vec::new();
        let mut rows = Vec::new();
        for (r, record) in reader.records().enumerate() {
            let record = record?;
            let found = record.len().saturating_sub(1);
            if found != col_names.len() {
                return Err(Error::RaggedRow {
                    row: r,
                    expected: col_names.len(),
                    found,
                });
            }
            row_names.push(record.get(0).unwrap_or_default().to_string());
            let row = record
                .iter()
                .skip(1)
                .enumerate()
                .map(|(c, raw)| parse_label(r, c, raw))
                .collect::<Result<Vec<_>>>()?;
            rows.push(row);
        }

        let matrix = if rows.is_empty() {
            CommunityMatrix::without_rows(col_names.len())
        } else {
            CommunityMatrix::from_rows(rows)?
        };
        debug!(rows = matrix.rows(), cols = matrix.cols(), "read community matrix");

        Ok(LabelledMatrix {
            matrix,
            row_names,
            col_names,
        })
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(io::BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lanes_follow_both_axes() {
        let m = CommunityMatrix::from_rows([[0u64, 1, 2], [3, 4, 5]]).unwrap();
        assert_eq!(m.lane(Axis::Row, 1).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(m.lane(Axis::Column, 2).collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(m.get(1, 0), Some(3));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = CommunityMatrix::from_rows(vec![vec![0u64, 1], vec![2]]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn negative_cells_are_invalid() {
        let err = CommunityMatrix::from_signed_rows([[0i64, -1]]).unwrap_err();
        assert!(matches!(err, Error::InvalidLabel { row: 0, col: 1, .. }));
    }

    #[test]
    fn name_lengths_must_match() {
        let m = CommunityMatrix::from_rows([[0u64, 1]]).unwrap();
        assert!(m.check_names(&["a"], &["x", "y"]).is_ok());
        let err = m.check_names(&["a"], &["x"]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                axis: Axis::Column,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn zero_column_rows_are_kept() {
        let m = CommunityMatrix::from_rows(vec![Vec::<Label>::new(); 3]).unwrap();
        assert_eq!((m.rows(), m.cols()), (3, 0));
        assert!(m.is_empty());
        assert_eq!(m.lane(Axis::Row, 2).count(), 0);
    }

    #[test]
    fn parse_label_accepts_integer_decimals() {
        assert_eq!(parse_label(0, 0, " 7 ").unwrap(), 7);
        assert_eq!(parse_label(0, 0, "3.0").unwrap(), 3);
        for bad in ["3.5", "-1", "abc", "", "NaN"] {
            assert!(parse_label(0, 0, bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn parse_label_rejects_inexact_values() {
        assert_eq!(parse_label(0, 0, "18446744073709551615").unwrap(), u64::MAX);
        for bad in ["18446744073709551616", "9007199254740993.0", "1e300"] {
            assert!(
                matches!(parse_label(2, 3, bad), Err(Error::InvalidLabel { row: 2, col: 3, .. })),
                "{bad}"
            );
        }
        assert_eq!(parse_label(0, 0, "9007199254740991.0").unwrap(), 9_007_199_254_740_991);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn lane_past_the_end_panics() {
        let m = CommunityMatrix::from_rows([[0u64, 1]]).unwrap();
        let _ = m.lane(Axis::Column, 2);
    }

    #[test]
    fn reads_labelled_csv() {
        let data = "sector,DEU,FRA,ITA\nagri,1,1,2\nmining,0,2,2\n";
        let lm = LabelledMatrix::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(lm.col_names, vec!["DEU", "FRA", "ITA"]);
        assert_eq!(lm.row_names, vec!["agri", "mining"]);
        assert_eq!(lm.matrix.to_rows(), vec![vec![1, 1, 2], vec![0, 2, 2]]);
    }

    #[test]
    fn csv_reports_bad_cells_and_short_rows() {
        let bad = "x,a,b\nr0,1,-2\n";
        assert!(matches!(
            LabelledMatrix::from_csv_reader(bad.as_bytes()),
            Err(Error::InvalidLabel { row: 0, col: 1, .. })
        ));
        let short = "x,a,b\nr0,1\n";
        assert!(matches!(
            LabelledMatrix::from_csv_reader(short.as_bytes()),
            Err(Error::RaggedRow { row: 0, .. })
        ));
    }

    #[test]
    fn header_only_csv_is_an_empty_matrix() {
        let lm = LabelledMatrix::from_csv_reader("x,a,b\n".as_bytes()).unwrap();
        assert_eq!((lm.matrix.rows(), lm.matrix.cols()), (0, 2));
        assert!(lm.row_names.is_empty());
    }
}
