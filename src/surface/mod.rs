//! Page-drawing surfaces consumed by the layout engine.
//!
//! A [`Surface`] places text, tables, rectangles and lines at absolute
//! millimetre coordinates measured from the top-left corner of the page, with
//! `y` growing downwards.  Text `y` coordinates are baselines.  Two surfaces
//! ship with the crate: [`recording::RecordingSurface`], which keeps the draw
//! operations for inspection, and [`pdf::PdfSurface`], which renders onto a
//! `genpdf` page.

pub mod pdf;
pub mod recording;
pub mod table;

use genpdf::style::Color;

use crate::error::Error;
use crate::model::HorizontalAlignment;

pub use table::{
    Cell, CellPadding, HeadStyle, TableLayout, TableSpec, TableTheme, VerticalAlignment,
};

/// Millimetres per typographic point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Returns the distance between consecutive baselines for a font size in points.
pub fn line_height(font_size: u8) -> f64 {
    f64::from(font_size) * LINE_HEIGHT_FACTOR * MM_PER_PT
}

/// Font and placement attributes of a text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in points.
    pub font_size: u8,
    /// Whether the bold face is used.
    pub bold: bool,
    /// Placement of the run relative to its `x` anchor.
    pub align: HorizontalAlignment,
}

impl TextStyle {
    /// Creates a regular, left-aligned style of the given size.
    pub fn new(font_size: u8) -> Self {
        Self {
            font_size,
            bold: false,
            align: HorizontalAlignment::Left,
        }
    }

    /// Switches to the bold face.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Sets the alignment and returns the updated style.
    pub fn with_align(mut self, align: HorizontalAlignment) -> Self {
        self.align = align;
        self
    }

    /// Distance between consecutive baselines in this style.
    pub fn line_height(&self) -> f64 {
        line_height(self.font_size)
    }
}

/// Alternating dash and gap lengths, in millimetres, used to stroke lines.
#[derive(Clone, Debug, PartialEq)]
pub struct DashPattern {
    lengths: Vec<f64>,
    phase: f64,
}

impl DashPattern {
    /// Creates a pattern from alternating dash/gap lengths and a starting phase.
    ///
    /// Returns `None` when no positive length is given, which stands for a solid line.
    pub fn new(lengths: impl Into<Vec<f64>>, phase: f64) -> Option<Self> {
        let lengths: Vec<f64> = lengths.into();
        if lengths.is_empty() || lengths.iter().any(|len| !(*len >= 0.0)) {
            return None;
        }
        if lengths.iter().all(|len| *len == 0.0) {
            return None;
        }
        Some(Self {
            lengths,
            phase: phase.max(0.0),
        })
    }

    /// Returns the dash/gap lengths.
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Returns the phase.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Splits the segment from `start` to `end` into the dashes that are stroked.
    pub fn dashes(&self, start: (f64, f64), end: (f64, f64)) -> Vec<((f64, f64), (f64, f64))> {
        let (dx, dy) = (end.0 - start.0, end.1 - start.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return Vec::new();
        }

        // An odd-length pattern repeats with dash and gap roles swapped.
        let mut cycle = self.lengths.clone();
        if cycle.len() % 2 == 1 {
            cycle.extend_from_slice(&self.lengths);
        }
        let period: f64 = cycle.iter().sum();

        let point = |t: f64| (start.0 + dx * t / length, start.1 + dy * t / length);
        let mut segments = Vec::new();
        let mut index = 0;
        let mut offset = -(self.phase % period);
        while offset < length {
            let piece = cycle[index % cycle.len()];
            let from = offset.max(0.0);
            let to = (offset + piece).min(length);
            if index % 2 == 0 && to > from {
                segments.push((point(from), point(to)));
            }
            offset += piece;
            index += 1;
        }
        segments
    }
}

/// Width measurement for text runs.
pub trait TextMeasure {
    /// Width of `text` in millimetres when drawn in `style`.
    fn text_width(&self, text: &str, style: &TextStyle) -> f64;
}

/// A page that the layout engine draws on.
///
/// Coordinates are millimetres from the top-left corner.  A surface is owned
/// exclusively for one generation and stops accepting operations after
/// [`Surface::save`].
pub trait Surface: TextMeasure {
    /// Full width of the page.
    fn page_width(&self) -> f64;

    /// Full height of the page.
    fn page_height(&self) -> f64;

    /// Draws a single line of text with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<(), Error>;

    /// Draws a table and returns the `y` coordinate right below it.
    fn draw_table(&mut self, table: &TableSpec) -> Result<f64, Error>;

    /// Strokes the outline of a rectangle.
    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), Error>;

    /// Strokes a straight line using the current dash pattern.
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), Error>;

    /// Sets the dash pattern for subsequent strokes; `None` restores solid lines.
    fn set_dash_pattern(&mut self, pattern: Option<DashPattern>) -> Result<(), Error>;

    /// Word-wraps `text` so that every line fits into `max_width`.
    fn wrap_text(&self, text: &str, max_width: f64, style: &TextStyle) -> Vec<String> {
        table::wrap_text(self, text, max_width, style)
    }

    /// Finishes the page and emits it under `file_name`.
    fn save(&mut self, file_name: &str) -> Result<(), Error>;
}

/// Fill used for header rows that request one.
pub const HEADER_FILL: Color = Color::Rgb(230, 230, 230);
