//! A surface that records draw operations instead of rendering them.

use std::fmt;

use super::{
    DashPattern, Surface, TableLayout, TableSpec, TextMeasure, TextStyle, MM_PER_PT,
};
use crate::error::Error;

/// Width of an A4 page in millimetres.
pub const A4_WIDTH_MM: f64 = 210.0;
/// Height of an A4 page in millimetres.
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Text metrics where every character has the same advance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedWidthMetrics {
    /// Advance of one regular character as a fraction of the font size.
    pub regular: f64,
    /// Advance of one bold character as a fraction of the font size.
    pub bold: f64,
}

impl Default for FixedWidthMetrics {
    fn default() -> Self {
        Self {
            regular: 0.5,
            bold: 0.55,
        }
    }
}

impl TextMeasure for FixedWidthMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        let advance = if style.bold { self.bold } else { self.regular };
        text.chars().count() as f64 * f64::from(style.font_size) * MM_PER_PT * advance
    }
}

/// A single recorded operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// A line of text with its baseline at `y`.
    Text {
        /// The text.
        text: String,
        /// Anchor `x`.
        x: f64,
        /// Baseline.
        y: f64,
        /// Font and alignment.
        style: TextStyle,
    },
    /// A table together with the `y` returned to the caller.
    Table {
        /// The table as requested.
        spec: TableSpec,
        /// Bottom edge of the laid out table.
        final_y: f64,
    },
    /// A stroked rectangle.
    Rect {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// A stroked line.
    Line {
        /// Start `x`.
        x1: f64,
        /// Start `y`.
        y1: f64,
        /// End `x`.
        x2: f64,
        /// End `y`.
        y2: f64,
        /// Dash pattern in effect, `None` for solid.
        dash: Option<DashPattern>,
    },
    /// A dash pattern change.
    Dash(Option<DashPattern>),
    /// The page was emitted.
    Save {
        /// File name of the artifact.
        file_name: String,
    },
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { text, x, y, style } => write!(
                f,
                "text    ({:7.2}, {:7.2}) {:>2}pt{} {:?} {:?}",
                x,
                y,
                style.font_size,
                if style.bold { " bold" } else { "" },
                style.align,
                text
            ),
            Self::Table { spec, final_y } => {
                write!(
                    f,
                    "table   y {:7.2} -> {:7.2} {:?} {}pt",
                    spec.start_y, final_y, spec.theme, spec.font_size
                )?;
                if let Some(head) = &spec.head {
                    let head: Vec<&str> = head.iter().map(|cell| cell.content.as_str()).collect();
                    write!(f, " head {:?}", head)?;
                }
                for row in &spec.body {
                    let row: Vec<&str> = row.iter().map(|cell| cell.content.as_str()).collect();
                    write!(f, "\n        {:?}", row)?;
                }
                Ok(())
            }
            Self::Rect {
                x,
                y,
                width,
                height,
            } => write!(f, "rect    ({:7.2}, {:7.2}) {:.2} x {:.2}", x, y, width, height),
            Self::Line {
                x1,
                y1,
                x2,
                y2,
                dash,
            } => write!(
                f,
                "line    ({:7.2}, {:7.2}) -> ({:7.2}, {:7.2}){}",
                x1,
                y1,
                x2,
                y2,
                if dash.is_some() { " dashed" } else { "" }
            ),
            Self::Dash(Some(pattern)) => write!(f, "dash    {:?}", pattern.lengths()),
            Self::Dash(None) => write!(f, "dash    solid"),
            Self::Save { file_name } => write!(f, "save    {}", file_name),
        }
    }
}

/// Surface that keeps every operation in order.
///
/// Tables are laid out with the same geometry as the PDF surface, using
/// [`FixedWidthMetrics`] for text widths, so the returned bottom edges behave
/// like the real ones.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    metrics: FixedWidthMetrics,
    dash: Option<DashPattern>,
    ops: Vec<DrawOp>,
    saved: Option<String>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(A4_WIDTH_MM, A4_HEIGHT_MM)
    }
}

impl RecordingSurface {
    /// Creates a recording surface with the given page size in millimetres.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            metrics: FixedWidthMetrics::default(),
            dash: None,
            ops: Vec::new(),
            saved: None,
        }
    }

    /// Replaces the text metrics and returns the updated surface.
    pub fn with_metrics(mut self, metrics: FixedWidthMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Returns the recorded operations.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Consumes the surface and returns the recorded operations.
    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Returns the file name passed to [`Surface::save`], if saved.
    pub fn saved_file_name(&self) -> Option<&str> {
        self.saved.as_deref()
    }

    fn ensure_open(&self) -> Result<(), Error> {
        match &self.saved {
            Some(file_name) => Err(Error::SurfaceFinished {
                file_name: file_name.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl TextMeasure for RecordingSurface {
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        self.metrics.text_width(text, style)
    }
}

impl Surface for RecordingSurface {
    fn page_width(&self) -> f64 {
        self.width
    }

    fn page_height(&self) -> f64 {
        self.height
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<(), Error> {
        self.ensure_open()?;
        self.ops.push(DrawOp::Text {
            text: text.to_owned(),
            x,
            y,
            style: *style,
        });
        Ok(())
    }

    fn draw_table(&mut self, table: &TableSpec) -> Result<f64, Error> {
        self.ensure_open()?;
        let layout = TableLayout::compute(table, self.width, &self.metrics);
        self.ops.push(DrawOp::Table {
            spec: table.clone(),
            final_y: layout.final_y,
        });
        Ok(layout.final_y)
    }

    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), Error> {
        self.ensure_open()?;
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), Error> {
        self.ensure_open()?;
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            dash: self.dash.clone(),
        });
        Ok(())
    }

    fn set_dash_pattern(&mut self, pattern: Option<DashPattern>) -> Result<(), Error> {
        self.ensure_open()?;
        self.dash = pattern.clone();
        self.ops.push(DrawOp::Dash(pattern));
        Ok(())
    }

    fn save(&mut self, file_name: &str) -> Result<(), Error> {
        self.ensure_open()?;
        self.ops.push(DrawOp::Save {
            file_name: file_name.to_owned(),
        });
        self.saved = Some(file_name.to_owned());
        Ok(())
    }
}
