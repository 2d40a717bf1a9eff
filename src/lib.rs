//! Printable Brazilian trade bills (Duplicata de Venda Mercantil).
//!
//! An [`InvoiceRecord`] is laid out by [`layout`] onto a [`surface::Surface`].
//! [`PdfBuilder`] does that on a `genpdf` page and writes
//! `duplicata-<number>.pdf`; [`surface::recording::RecordingSurface`] keeps the
//! draw operations instead.  Frontends drive a [`Session`] with [`Command`]s
//! and present the returned [`Outcome`]s.

pub mod builder;
pub mod error;
pub mod fonts;
pub mod format;
pub mod layout;
pub mod model;
pub mod session;
pub mod store;
pub mod surface;
pub mod words;

pub use builder::{PdfBuilder, PdfOutput};
pub use error::Error;
pub use model::{InvoiceRecord, MissingFields, Party, RequiredField};
pub use session::{Command, DocumentGenerator, Outcome, Session};
pub use store::CreditorStore;
