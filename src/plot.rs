//! The three plotting entry points.
//!
//! Each one validates its input, assigns colors over the original label set,
//! computes the row and column display orders for its mode and hands the
//! resulting [`Arrangement`] to a [`MatrixRenderer`].

use tracing::debug;

use crate::color::{ColorAssigner, ColorMap};
use crate::config::PlotConfig;
use crate::error::Result;
use crate::matrix::{Axis, CommunityMatrix};
use crate::order::{MajorityOrderer, Permutation};
use crate::ranking::FrequencyRanking;
use crate::render::MatrixRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    /// Rows and columns as given.
    Original,
    /// Majority order on one axis, the other as given.
    OrderOne(Axis),
    /// Majority order on both axes.
    OrderBoth,
}

impl PlotMode {
    pub fn reorders(self, axis: Axis) -> bool {
        match self {
            PlotMode::Original => false,
            PlotMode::OrderOne(a) => a == axis,
            PlotMode::OrderBoth => true,
        }
    }

    /// Default output file stem for this mode.
    pub fn file_stem(self) -> &'static str {
        match self {
            PlotMode::Original => "original",
            PlotMode::OrderOne(_) => "order1",
            PlotMode::OrderBoth => "order2",
        }
    }
}

/// Everything a renderer needs: the matrix and names in display order,
/// the orders themselves, and the label colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrangement {
    pub mode: PlotMode,
    pub matrix: CommunityMatrix,
    pub row_names: Vec<String>,
    pub col_names: Vec<String>,
    pub row_order: Permutation,
    pub col_order: Permutation,
    pub colors: ColorMap,
}

/// Compute the arrangement for `mode` without rendering it.
pub fn arrange<S: AsRef<str>>(
    matrix: &CommunityMatrix,
    rownames: &[S],
    colnames: &[S],
    mode: PlotMode,
    config: &PlotConfig,
) -> Result<Arrangement> {
    matrix.check_names(rownames, colnames)?;

    let colors = ColorAssigner::new(config.colors).assign(matrix.labels());

    let (row_order, col_order) = if mode == PlotMode::Original {
        (
            Permutation::identity(matrix.rows()),
            Permutation::identity(matrix.cols()),
        )
    } else {
        let ranking = FrequencyRanking::rank(matrix);
        let orderer = MajorityOrderer::new(&ranking).with_tie_break(config.tie_break);
        let order = |axis: Axis| {
            if mode.reorders(axis) {
                orderer.order_axis(matrix, axis)
            } else {
                Ok(Permutation::identity(matrix.len_of(axis)))
            }
        };
        (order(Axis::Row)?, order(Axis::Column)?)
    };
    debug!(?mode, labels = colors.len(), "arranged community matrix");

    let names = |names: &[S]| -> Vec<String> {
        names.iter().map(|s| s.as_ref().to_string()).collect()
    };
    Ok(Arrangement {
        mode,
        matrix: matrix.permuted(&row_order, &col_order),
        row_names: row_order.apply(&names(rownames)),
        col_names: col_order.apply(&names(colnames)),
        row_order,
        col_order,
        colors,
    })
}

pub fn arrange_original<S: AsRef<str>>(
    matrix: &CommunityMatrix,
    rownames: &[S],
    colnames: &[S],
    config: &PlotConfig,
) -> Result<Arrangement> {
    arrange(matrix, rownames, colnames, PlotMode::Original, config)
}

/// Reorder rows when `row` is true, columns otherwise.
pub fn arrange_order1<S: AsRef<str>>(
    matrix: &CommunityMatrix,
    rownames: &[S],
    colnames: &[S],
    row: bool,
    config: &PlotConfig,
) -> Result<Arrangement> {
    let axis = if row { Axis::Row } else { Axis::Column };
    arrange(matrix, rownames, colnames, PlotMode::OrderOne(axis), config)
}

pub fn arrange_order2<S: AsRef<str>>(
    matrix: &CommunityMatrix,
    rownames: &[S],
    colnames: &[S],
    config: &PlotConfig,
) -> Result<Arrangement> {
    arrange(matrix, rownames, colnames, PlotMode::OrderBoth, config)
}

/// Arranges community matrices and renders them.
#[derive(Debug)]
pub struct Plotter<R> {
    config: PlotConfig,
    renderer: R,
}

impl<R: MatrixRenderer> Plotter<R> {
    pub fn new(config: PlotConfig, renderer: R) -> Self {
        Plotter { config, renderer }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn plot<S: AsRef<str>>(
        &mut self,
        matrix: &CommunityMatrix,
        rownames: &[S],
        colnames: &[S],
        mode: PlotMode,
    ) -> Result<Arrangement> {
        let arrangement = arrange(matrix, rownames, colnames, mode, &self.config)?;
        self.renderer.render(&arrangement)?;
        Ok(arrangement)
    }

    pub fn plot_com_original<S: AsRef<str>>(
        &mut self,
        matrix: &CommunityMatrix,
        rownames: &[S],
        colnames: &[S],
    ) -> Result<Arrangement> {
        self.plot(matrix, rownames, colnames, PlotMode::Original)
    }

    pub fn plot_com_order1<S: AsRef<str>>(
        &mut self,
        matrix: &CommunityMatrix,
        rownames: &[S],
        colnames: &[S],
        row: bool,
    ) -> Result<Arrangement> {
        let axis = if row { Axis::Row } else { Axis::Column };
        self.plot(matrix, rownames, colnames, PlotMode::OrderOne(axis))
    }

    pub fn plot_com_order2<S: AsRef<str>>(
        &mut self,
        matrix: &CommunityMatrix,
        rownames: &[S],
        colnames: &[S],
    ) -> Result<Arrangement> {
        self.plot(matrix, rownames, colnames, PlotMode::OrderBoth)
    }
}
