//! Drawing an [`Arrangement`] as a colored grid.

use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::plot::Arrangement;

const MARGIN: i32 = 20;
const GAP: i32 = 6;

/// Consumes the output of the plotting entry points.
pub trait MatrixRenderer {
    fn render(&mut self, arrangement: &Arrangement) -> Result<()>;
}

impl<R: MatrixRenderer + ?Sized> MatrixRenderer for &mut R {
    fn render(&mut self, arrangement: &Arrangement) -> Result<()> {
        (**self).render(arrangement)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Side of one cell in pixels.
    pub cell_size: u32,
    pub font_size: u32,
    /// Draw a swatch per label next to the grid.
    pub legend: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            cell_size: 24,
            font_size: 12,
            legend: true,
        }
    }
}

/// Pixel geometry of one plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    left: i32,
    top: i32,
    cell: i32,
    line: i32,
    legend_x: i32,
    width: u32,
    height: u32,
}

impl Layout {
    /// Fails when the canvas does not fit in `i32` pixel coordinates.
    fn new(arrangement: &Arrangement, options: &RenderOptions) -> Result<Self> {
        let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        let cell = i64::from(options.cell_size.max(1));
        let font = i64::from(options.font_size.max(1));
        let (margin, gap) = (i64::from(MARGIN), i64::from(GAP));
        // Rough glyph width; labels only need to clear the grid.
        let text_width = |chars: usize| count(chars).saturating_mul(font).saturating_mul(3) / 5;
        let widest = |names: &[String]| names.iter().map(|n| n.chars().count()).max().unwrap_or(0);

        let left = margin + text_width(widest(&arrangement.row_names)) + gap;
        let top = margin + text_width(widest(&arrangement.col_names)) + gap;
        let grid_w = count(arrangement.matrix.cols()).saturating_mul(cell);
        let grid_h = count(arrangement.matrix.rows()).saturating_mul(cell);

        let line = font + gap;
        let legend_x = left.saturating_add(grid_w).saturating_add(margin);
        let (legend_w, legend_h) = if options.legend && !arrangement.colors.is_empty() {
            let digits = arrangement
                .colors
                .labels()
                .map(|l| l.to_string().len())
                .max()
                .unwrap_or(0);
            (
                font + gap + text_width(digits),
                top.saturating_add(count(arrangement.colors.len()).saturating_mul(line)),
            )
        } else {
            (0, 0)
        };

        let width = legend_x.saturating_add(legend_w).saturating_add(margin);
        let height = top.saturating_add(grid_h).max(legend_h).saturating_add(margin);
        // Every drawn coordinate lies within the canvas, so checking its
        // extent covers the rest.
        let (Ok(width), Ok(height)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(Error::Render(format!("canvas of {width}x{height} pixels is too large")));
        };
        let fit = |v: i64| {
            i32::try_from(v).map_err(|_| Error::Render(format!("coordinate {v} out of range")))
        };

        Ok(Layout {
            left: fit(left)?,
            top: fit(top)?,
            cell: fit(cell)?,
            line: fit(line)?,
            legend_x: fit(legend_x)?,
            width: width.unsigned_abs(),
            height: height.unsigned_abs(),
        })
    }
}

fn fill(rgb: Rgb) -> ShapeStyle {
    let [r, g, b] = rgb.to_u8();
    RGBColor(r, g, b).filled()
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    arrangement: &Arrangement,
    layout: &Layout,
    options: &RenderOptions,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let font = options.font_size.max(1) as i32;
    let cell = layout.cell;

    let row_style = ("sans-serif", font)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (r, name) in arrangement.row_names.iter().enumerate() {
        let y = layout.top + r as i32 * cell + cell / 2;
        root.draw(&Text::new(name.as_str(), (layout.left - GAP, y), row_style.clone()))?;
    }

    // Column names sit above the grid, reading upwards.
    let col_style = ("sans-serif", font)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (c, name) in arrangement.col_names.iter().enumerate() {
        let x = layout.left + c as i32 * cell + cell / 2;
        root.draw(&Text::new(name.as_str(), (x, layout.top - GAP), col_style.clone()))?;
    }

    let matrix = &arrangement.matrix;
    for r in 0..matrix.rows() {
        for (c, &label) in matrix.row(r).iter().enumerate() {
            let Some(rgb) = arrangement.colors.get(label) else {
                continue;
            };
            let x0 = layout.left + c as i32 * cell;
            let y0 = layout.top + r as i32 * cell;
            root.draw(&Rectangle::new([(x0, y0), (x0 + cell, y0 + cell)], fill(rgb)))?;
        }
    }

    if options.legend {
        let label_style = ("sans-serif", font)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (k, (label, rgb)) in arrangement.colors.iter().enumerate() {
            let y = layout.top + k as i32 * layout.line;
            let x = layout.legend_x;
            root.draw(&Rectangle::new([(x, y), (x + font, y + font)], fill(rgb)))?;
            root.draw(&Text::new(
                label.to_string(),
                (x + font + GAP, y + font / 2),
                label_style.clone(),
            ))?;
        }
    }

    root.present()
}

/// Writes each arrangement to an SVG file.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    path: PathBuf,
    options: RenderOptions,
}

impl SvgRenderer {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        SvgRenderer {
            path: path.into(),
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatrixRenderer for SvgRenderer {
    fn render(&mut self, arrangement: &Arrangement) -> Result<()> {
        let layout = Layout::new(arrangement, &self.options)?;
        let root = SVGBackend::new(&self.path, (layout.width, layout.height)).into_drawing_area();
        draw(&root, arrangement, &layout, &self.options).map_err(|e| Error::Render(e.to_string()))?;
        info!(
            path = %self.path.display(),
            mode = ?arrangement.mode,
            width = layout.width,
            height = layout.height,
            "wrote community plot"
        );
        Ok(())
    }
}
