//! Renders duplicatas to PDF with the crate defaults.

use std::path::PathBuf;

use genpdf::fonts::{FontData, FontFamily};
use genpdf::{PaperSize, Size};
use log::{debug, info};

use crate::error::Error;
use crate::fonts;
use crate::layout;
use crate::model::InvoiceRecord;
use crate::surface::pdf::PdfSurface;

pub use crate::surface::pdf::PdfOutput;

/// Document title used when none is configured.
pub const DEFAULT_TITLE: &str = "Duplicata de Venda Mercantil";

/// Builder for PDF duplicatas pre-configured with the crate defaults.
///
/// ```no_run
/// use duplicata::{InvoiceRecord, PdfBuilder};
///
/// let record: InvoiceRecord = serde_json::from_str(r#"{ "number": "001/2024" }"#)?;
/// let path = PdfBuilder::new().with_output_dir("out").generate(&record)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default)]
pub struct PdfBuilder {
    paper_size: Option<Size>,
    title: Option<String>,
    output_dir: Option<PathBuf>,
    fonts: Option<FontFamily<FontData>>,
}

impl PdfBuilder {
    /// Creates a new builder with A4 paper and the default fonts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size of generated documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the title stored in the document metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the directory [`PdfBuilder::generate`] writes into.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Uses an already loaded font family instead of searching for one.
    pub fn with_fonts(mut self, fonts: FontFamily<FontData>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Renders `record` in memory.
    pub fn render(&self, record: &InvoiceRecord) -> Result<PdfOutput, Error> {
        let mut surface = self.surface()?;
        layout::generate(record, &mut surface)?;
        surface.into_output().ok_or_else(|| Error::SurfaceFinished {
            file_name: record.output_file_name(),
        })
    }

    /// Renders `record` and writes it to the output directory, the current
    /// directory when none is set.  Returns the written path.
    pub fn generate(&self, record: &InvoiceRecord) -> Result<PathBuf, Error> {
        let dir = self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let mut surface = self.surface()?.with_output_dir(dir.clone());
        let file_name = layout::generate(record, &mut surface)?;
        let path = dir.join(file_name);
        info!("Generated {}", path.display());
        Ok(path)
    }

    fn surface(&self) -> Result<PdfSurface, Error> {
        let fonts = match &self.fonts {
            Some(fonts) => fonts.clone(),
            None => {
                let (fonts, source) = fonts::load_font_family().map_err(Error::FontLoad)?;
                debug!("Loaded {}", source);
                fonts
            }
        };
        let paper_size = self.paper_size.unwrap_or_else(|| PaperSize::A4.into());
        let title = self.title.as_deref().unwrap_or(DEFAULT_TITLE);
        PdfSurface::new(paper_size, title, fonts)
    }
}
