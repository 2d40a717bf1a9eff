//! Surface that renders onto a `genpdf` page.
//!
//! The surface bypasses `genpdf`'s flowing document model and draws straight
//! onto the first layer of a single page, which gives the absolute placement
//! the fixed form needs while still using `genpdf` for font embedding, text
//! metrics and PDF serialisation.

use std::fs;
use std::path::{Path, PathBuf};

use genpdf::fonts::{FontCache, FontData, FontFamily};
use genpdf::render::{Area, Renderer};
use genpdf::style::{Color, Style};
use genpdf::{Mm, Position, Size};
use log::debug;

use super::{DashPattern, Surface, TableLayout, TableSpec, TableTheme, TextMeasure, TextStyle};
use crate::error::Error;
use crate::model::HorizontalAlignment;

/// Distance between the hairlines that paint a filled row. Strokes keep the
/// PDF default width of 1pt, so this leaves no gaps.
const FILL_STEP_MM: f64 = 0.3;

fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn position(x: f64, y: f64) -> Position {
    Position::new(mm_from_f64(x), mm_from_f64(y))
}

/// Offsets below the top of a filled band at which hairlines are drawn.
fn fill_offsets(height: f64) -> Vec<f64> {
    if height <= 0.0 {
        return Vec::new();
    }
    let count = (height / FILL_STEP_MM).ceil() as usize;
    let step = height / count as f64;
    (0..count).map(|i| step * (i as f64 + 0.5)).collect()
}

/// A rendered document and the file name it was saved under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfOutput {
    /// File name passed to [`Surface::save`].
    pub file_name: String,
    /// Serialised PDF bytes.
    pub bytes: Vec<u8>,
}

/// A single-page `genpdf` renderer addressed in absolute millimetres.
pub struct PdfSurface {
    renderer: Option<Renderer>,
    font_cache: FontCache,
    size: Size,
    dash: Option<DashPattern>,
    output_dir: Option<PathBuf>,
    output: Option<PdfOutput>,
}

impl PdfSurface {
    /// Creates a one-page document of `size` titled `title` using `fonts`.
    pub fn new(
        size: impl Into<Size>,
        title: impl AsRef<str>,
        fonts: FontFamily<FontData>,
    ) -> Result<Self, Error> {
        let size = size.into();
        let renderer = Renderer::new(size, title).map_err(Error::Render)?;
        let mut font_cache = FontCache::new(fonts);
        font_cache
            .load_pdf_fonts(&renderer)
            .map_err(Error::FontLoad)?;

        Ok(Self {
            renderer: Some(renderer),
            font_cache,
            size,
            dash: None,
            output_dir: None,
            output: None,
        })
    }

    /// Writes the document into `dir` when it is saved.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Returns the saved document, if [`Surface::save`] has run.
    pub fn output(&self) -> Option<&PdfOutput> {
        self.output.as_ref()
    }

    /// Consumes the surface and returns the saved document, if any.
    pub fn into_output(self) -> Option<PdfOutput> {
        self.output
    }

    /// Path the document is written to on save, if an output directory is set.
    pub fn output_path(&self, file_name: &str) -> Option<PathBuf> {
        self.output_dir.as_deref().map(|dir| dir.join(file_name))
    }

    fn area(&self) -> Result<Area<'_>, Error> {
        match &self.renderer {
            Some(renderer) => Ok(renderer.first_page().first_layer().area()),
            None => Err(self.finished()),
        }
    }

    fn finished(&self) -> Error {
        Error::SurfaceFinished {
            file_name: self
                .output
                .as_ref()
                .map(|output| output.file_name.clone())
                .unwrap_or_default(),
        }
    }

    fn pdf_style(style: &TextStyle) -> Style {
        let mut pdf_style = Style::new().with_font_size(style.font_size);
        if style.bold {
            pdf_style.set_bold();
        }
        pdf_style
    }

    fn print(&self, text: &str, x: f64, baseline: f64, style: &TextStyle) -> Result<(), Error> {
        if text.is_empty() {
            return Ok(());
        }
        let pdf_style = Self::pdf_style(style);
        let width = self.text_width(text, style);
        let left = match style.align {
            HorizontalAlignment::Left => x,
            HorizontalAlignment::Center => x - width / 2.0,
            HorizontalAlignment::Right => x - width,
        };
        // genpdf positions text by the top of its line box.
        let ascent = pdf_style
            .font(&self.font_cache)
            .glyph_height(pdf_style.font_size());
        let top = baseline - mm_to_f64(ascent);

        self.area()?
            .print_str(&self.font_cache, position(left, top), pdf_style, text)
            .map_err(Error::Render)?;
        Ok(())
    }

    fn stroke(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        dash: Option<&DashPattern>,
    ) -> Result<(), Error> {
        let area = self.area()?;
        let segments = match dash {
            Some(pattern) => pattern.dashes(from, to),
            None => vec![(from, to)],
        };
        for (start, end) in segments {
            area.draw_line(
                vec![position(start.0, start.1), position(end.0, end.1)],
                Style::new(),
            );
        }
        Ok(())
    }

    fn stroke_rect(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        dash: Option<&DashPattern>,
    ) -> Result<(), Error> {
        let corners = [
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
            (x, y),
        ];
        for edge in corners.windows(2) {
            self.stroke(edge[0], edge[1], dash)?;
        }
        Ok(())
    }

    /// Paints a rectangle with horizontal hairlines in `color`.
    fn fill_rect(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    ) -> Result<(), Error> {
        let area = self.area()?;
        for offset in fill_offsets(height) {
            area.draw_line(
                vec![position(x, y + offset), position(x + width, y + offset)],
                Style::new().with_color(color),
            );
        }
        Ok(())
    }

    fn write_output(&self, path: &Path, bytes: &[u8]) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
            }
        }
        fs::write(path, bytes).map_err(|err| Error::io(path, err))
    }
}

impl TextMeasure for PdfSurface {
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        mm_to_f64(Self::pdf_style(style).str_width(&self.font_cache, text))
    }
}

impl Surface for PdfSurface {
    fn page_width(&self) -> f64 {
        mm_to_f64(self.size.width)
    }

    fn page_height(&self) -> f64 {
        mm_to_f64(self.size.height)
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> Result<(), Error> {
        self.print(text, x, y, style)
    }

    fn draw_table(&mut self, table: &TableSpec) -> Result<f64, Error> {
        self.area()?;
        let layout = TableLayout::compute(table, self.page_width(), &*self);

        for row in &layout.rows {
            if let Some(fill) = row.fill {
                self.fill_rect(layout.x, row.y, layout.width, row.height, fill)?;
            }
            for cell in &row.cells {
                if table.theme == TableTheme::Grid {
                    self.stroke_rect(cell.x, row.y, cell.width, row.height, None)?;
                }
                let style = row.style.with_align(cell.align);
                for line in &cell.lines {
                    self.print(&line.text, line.x, line.y, &style)?;
                }
            }
        }

        Ok(layout.final_y)
    }

    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), Error> {
        self.stroke_rect(x, y, width, height, self.dash.as_ref())
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), Error> {
        self.stroke((x1, y1), (x2, y2), self.dash.as_ref())
    }

    fn set_dash_pattern(&mut self, pattern: Option<DashPattern>) -> Result<(), Error> {
        self.area()?;
        self.dash = pattern;
        Ok(())
    }

    fn save(&mut self, file_name: &str) -> Result<(), Error> {
        let renderer = self.renderer.take().ok_or_else(|| self.finished())?;
        let mut bytes = Vec::new();
        renderer.write(&mut bytes).map_err(Error::Render)?;
        debug!("Rendered {} ({} bytes)", file_name, bytes.len());

        if let Some(path) = self.output_path(file_name) {
            self.write_output(&path, &bytes)?;
            debug!("Wrote {}", path.display());
        }

        self.output = Some(PdfOutput {
            file_name: file_name.to_owned(),
            bytes,
        });
        Ok(())
    }
}
