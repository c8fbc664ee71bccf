//! Majority-rule ordering and distinct coloring of community arrays.
//!
//! A community array is a matrix of community labels whose rows and columns
//! are two nominal attributes (for example sectors and countries). The crate
//! colors every label distinctly, optionally reorders rows and columns so
//! the dominant communities cluster at the top left, and hands the result to
//! a [`MatrixRenderer`].

pub mod color;
pub mod config;
pub mod error;
pub mod generate;
pub mod matrix;
pub mod order;
pub mod plot;
pub mod ranking;
pub mod render;

pub use color::{ColorAssigner, ColorMap, ColorScheme, Rgb};
pub use config::PlotConfig;
pub use error::{Error, Result};
pub use matrix::{Axis, CommunityMatrix, Label, LabelledMatrix};
pub use order::{AxisMajority, MajorityOrderer, MajorityTieBreak, Permutation};
pub use plot::{Arrangement, PlotMode, Plotter, arrange, arrange_order1, arrange_order2, arrange_original};
pub use ranking::FrequencyRanking;
pub use render::{MatrixRenderer, RenderOptions, SvgRenderer};
