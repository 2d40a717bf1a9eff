//! Table description and geometry shared by every surface.
//!
//! Tables follow the usual grid conventions of PDF table plugins: the table
//! spans the page between two margins, columns split the width evenly, cell
//! text is split on `\n` and word-wrapped to the inner cell width, and each row
//! grows to fit its tallest cell.  [`TableLayout::compute`] turns a
//! [`TableSpec`] into absolute positions so a surface only has to paint them.

use genpdf::style::Color;

use super::{line_height, TextMeasure, TextStyle, MM_PER_PT};
use crate::model::HorizontalAlignment;

/// Portion of the font size between the top of a line box and its baseline.
const ASCENT_RATIO: f64 = 0.8;

/// Border style of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableTheme {
    /// Every cell is outlined.
    #[default]
    Grid,
    /// No borders at all.
    Plain,
}

/// Vertical placement of text inside a row taller than the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    /// Text starts at the top padding.
    #[default]
    Top,
    /// Text is centered between the paddings.
    Middle,
}

/// Space between the cell border and its text, in millimetres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellPadding {
    /// Space above the text.
    pub top: f64,
    /// Space right of the text.
    pub right: f64,
    /// Space below the text.
    pub bottom: f64,
    /// Space left of the text.
    pub left: f64,
}

impl CellPadding {
    /// Uses the same padding on every side.
    pub fn uniform(padding: f64) -> Self {
        Self {
            top: padding,
            right: padding,
            bottom: padding,
            left: padding,
        }
    }

    /// Creates a padding from explicit sides.
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// A table cell: its text and an optional alignment override.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    /// Cell text; `\n` starts a new line.
    pub content: String,
    /// Horizontal alignment, left when unset.
    pub align: Option<HorizontalAlignment>,
}

impl Cell {
    /// Creates a left-aligned cell.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            align: None,
        }
    }

    /// Sets the alignment and returns the updated cell.
    pub fn aligned(mut self, align: HorizontalAlignment) -> Self {
        self.align = Some(align);
        self
    }
}

impl From<&str> for Cell {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for Cell {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

/// Styling of the optional header row.  Unset values inherit the body style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadStyle {
    /// Font size in points.
    pub font_size: Option<u8>,
    /// Whether the header uses the bold face.
    pub bold: bool,
    /// Header cell padding.
    pub padding: Option<CellPadding>,
    /// Background of the header row.
    pub fill: Option<Color>,
}

impl Default for HeadStyle {
    fn default() -> Self {
        Self {
            font_size: None,
            bold: true,
            padding: None,
            fill: None,
        }
    }
}

/// Everything a surface needs to draw one table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpec {
    /// Top edge of the table.
    pub start_y: f64,
    /// Distance from the left page edge.
    pub margin_left: f64,
    /// Distance from the right page edge.
    pub margin_right: f64,
    /// Border style.
    pub theme: TableTheme,
    /// Body font size in points.
    pub font_size: u8,
    /// Body cell padding.
    pub padding: CellPadding,
    /// Vertical alignment of cell text.
    pub valign: VerticalAlignment,
    /// Optional header row.
    pub head: Option<Vec<Cell>>,
    /// Header row styling.
    pub head_style: HeadStyle,
    /// Body rows.
    pub body: Vec<Vec<Cell>>,
}

impl TableSpec {
    /// Creates an empty table starting at `start_y` with 10pt text and no padding.
    pub fn new(theme: TableTheme, start_y: f64) -> Self {
        Self {
            start_y,
            margin_left: 0.0,
            margin_right: 0.0,
            theme,
            font_size: 10,
            padding: CellPadding::default(),
            valign: VerticalAlignment::Top,
            head: None,
            head_style: HeadStyle::default(),
            body: Vec::new(),
        }
    }

    /// Sets the left and right margins.
    pub fn with_margins(mut self, left: f64, right: f64) -> Self {
        self.margin_left = left;
        self.margin_right = right;
        self
    }

    /// Sets the body font size.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the body cell padding.
    pub fn with_padding(mut self, padding: CellPadding) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the vertical alignment of cell text.
    pub fn with_valign(mut self, valign: VerticalAlignment) -> Self {
        self.valign = valign;
        self
    }

    /// Adds a header row with its own style.
    pub fn with_head<I, C>(mut self, cells: I, style: HeadStyle) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.head = Some(cells.into_iter().map(Into::into).collect());
        self.head_style = style;
        self
    }

    /// Sets the header styling without adding a header row.
    pub fn with_head_style(mut self, style: HeadStyle) -> Self {
        self.head_style = style;
        self
    }

    /// Appends a body row.
    pub fn with_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.body.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Number of columns, the widest row decides.
    pub fn column_count(&self) -> usize {
        self.head
            .iter()
            .chain(self.body.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Iterates over the body cell texts, row by row.
    pub fn body_texts(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .flat_map(|row| row.iter().map(|cell| cell.content.as_str()))
    }
}

/// A positioned line of cell text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// Text of the line.
    pub text: String,
    /// Anchor `x`; its meaning depends on the cell alignment.
    pub x: f64,
    /// Baseline.
    pub y: f64,
}

/// Computed placement of one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellLayout {
    /// Left edge.
    pub x: f64,
    /// Cell width.
    pub width: f64,
    /// Alignment applied to every line.
    pub align: HorizontalAlignment,
    /// Wrapped lines.
    pub lines: Vec<TextLine>,
}

/// Computed placement of one row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowLayout {
    /// Top edge.
    pub y: f64,
    /// Row height.
    pub height: f64,
    /// Text style shared by the cells of this row, alignment excluded.
    pub style: TextStyle,
    /// Background, if any.
    pub fill: Option<Color>,
    /// Cells from left to right.
    pub cells: Vec<CellLayout>,
}

/// Absolute geometry of a table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableLayout {
    /// Left edge.
    pub x: f64,
    /// Total width.
    pub width: f64,
    /// Header row first, if present, then body rows.
    pub rows: Vec<RowLayout>,
    /// The `y` coordinate right below the last row.
    pub final_y: f64,
}

impl TableLayout {
    /// Lays out `spec` on a page of `page_width` using `measure` for text widths.
    pub fn compute<M>(spec: &TableSpec, page_width: f64, measure: &M) -> Self
    where
        M: TextMeasure + ?Sized,
    {
        let x = spec.margin_left;
        let width = (page_width - spec.margin_left - spec.margin_right).max(0.0);
        let columns = spec.column_count();
        let column_width = width / columns as f64;

        let mut rows = Vec::with_capacity(spec.body.len() + 1);
        let mut y = spec.start_y;

        if let Some(head) = &spec.head {
            let head_style = &spec.head_style;
            let mut style = TextStyle::new(head_style.font_size.unwrap_or(spec.font_size));
            style.bold = head_style.bold;
            let padding = head_style.padding.unwrap_or(spec.padding);
            let row = layout_row(
                head,
                RowGeometry {
                    x,
                    y,
                    column_width,
                    padding,
                    valign: spec.valign,
                },
                style,
                head_style.fill,
                measure,
            );
            y += row.height;
            rows.push(row);
        }

        for cells in &spec.body {
            let row = layout_row(
                cells,
                RowGeometry {
                    x,
                    y,
                    column_width,
                    padding: spec.padding,
                    valign: spec.valign,
                },
                TextStyle::new(spec.font_size),
                None,
                measure,
            );
            y += row.height;
            rows.push(row);
        }

        Self {
            x,
            width,
            rows,
            final_y: y,
        }
    }
}

struct RowGeometry {
    x: f64,
    y: f64,
    column_width: f64,
    padding: CellPadding,
    valign: VerticalAlignment,
}

fn layout_row<M>(
    cells: &[Cell],
    geometry: RowGeometry,
    style: TextStyle,
    fill: Option<Color>,
    measure: &M,
) -> RowLayout
where
    M: TextMeasure + ?Sized,
{
    let RowGeometry {
        x,
        y,
        column_width,
        padding,
        valign,
    } = geometry;
    let inner_width = (column_width - padding.left - padding.right).max(0.0);
    let line_height = style.line_height();

    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .map(|cell| {
            let cell_style = style.with_align(cell.align.unwrap_or_default());
            cell.content
                .split('\n')
                .flat_map(|segment| wrap_text(measure, segment, inner_width, &cell_style))
                .collect()
        })
        .collect();

    let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let height = max_lines as f64 * line_height + padding.top + padding.bottom;

    let layouts = cells
        .iter()
        .zip(wrapped)
        .enumerate()
        .map(|(column, (cell, lines))| {
            let cell_x = x + column as f64 * column_width;
            let align = cell.align.unwrap_or_default();
            let anchor_x = match align {
                HorizontalAlignment::Left => cell_x + padding.left,
                HorizontalAlignment::Center => cell_x + padding.left + inner_width / 2.0,
                HorizontalAlignment::Right => cell_x + column_width - padding.right,
            };
            let text_height = lines.len() as f64 * line_height;
            let top = match valign {
                VerticalAlignment::Top => y + padding.top,
                VerticalAlignment::Middle => {
                    y + padding.top
                        + ((height - padding.top - padding.bottom) - text_height) / 2.0
                }
            };
            let lines = lines
                .into_iter()
                .enumerate()
                .map(|(index, text)| TextLine {
                    text,
                    x: anchor_x,
                    y: first_baseline(top, style.font_size) + index as f64 * line_height,
                })
                .collect();
            CellLayout {
                x: cell_x,
                width: column_width,
                align,
                lines,
            }
        })
        .collect();

    RowLayout {
        y,
        height,
        style,
        fill,
        cells: layouts,
    }
}

/// Baseline of the first line of a text block whose line box starts at `top`.
pub fn first_baseline(top: f64, font_size: u8) -> f64 {
    let font_mm = f64::from(font_size) * MM_PER_PT;
    let half_leading = (line_height(font_size) - font_mm) / 2.0;
    top + half_leading + font_mm * ASCENT_RATIO
}

/// Greedy word wrap of `text` to `max_width`.
///
/// Explicit `\n` always breaks.  A word wider than the limit is split between
/// characters.  An empty paragraph yields one empty line.
pub fn wrap_text<M>(measure: &M, text: &str, max_width: f64, style: &TextStyle) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let fits = |candidate: &str| measure.text_width(candidate, style) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut has_words = false;

        for word in paragraph.split_whitespace() {
            has_words = true;
            if !line.is_empty() {
                let candidate = format!("{} {}", line, word);
                if fits(&candidate) {
                    line = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut line));
            }

            if fits(word) {
                line.push_str(word);
                continue;
            }

            for c in word.chars() {
                let mut candidate = line.clone();
                candidate.push(c);
                if line.is_empty() || fits(&candidate) {
                    line = candidate;
                } else {
                    lines.push(std::mem::replace(&mut line, c.to_string()));
                }
            }
        }

        if has_words {
            lines.push(line);
        } else {
            lines.push(String::new());
        }
    }

    lines
}
