use thiserror::Error;

use crate::matrix::{Axis, Label};

/// Result alias for `community_plot`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while loading, arranging or rendering a community matrix.
#[derive(Debug, Error)]
pub enum Error {
    /// A name list does not match the length of its matrix axis.
    #[error("{axis} names: expected {expected}, found {found}")]
    ShapeMismatch {
        axis: Axis,
        expected: usize,
        found: usize,
    },

    /// A row has a different number of cells than the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell is negative or not an integer.
    #[error("invalid label {value:?} at row {row}, column {col}")]
    InvalidLabel {
        row: usize,
        col: usize,
        value: String,
    },

    /// A label was looked up in a ranking built from a different matrix.
    #[error("label {0} is not part of the frequency ranking")]
    UnrankedLabel(Label),

    /// An option value that cannot be used.
    #[error("invalid {name}: {value}")]
    InvalidOption { name: &'static str, value: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The rendering backend failed.
    #[error("render failed: {0}")]
    Render(String),
}
