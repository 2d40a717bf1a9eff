//! Error type shared by the layout engine, the PDF surface and the creditor store.

use std::io;

use thiserror::Error;

use crate::model::MissingFields;

/// Errors produced while rendering or persisting a duplicata.
#[derive(Debug, Error)]
pub enum Error {
    /// Fonts could not be located or parsed.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    /// `genpdf` rejected a drawing or serialisation request.
    #[error("failed to render document: {0}")]
    Render(#[source] genpdf::error::Error),

    /// The surface was already saved and cannot accept further drawing.
    #[error("drawing surface already saved as {file_name}")]
    SurfaceFinished {
        /// Name under which the surface was saved.
        file_name: String,
    },

    /// The record misses fields the caller must provide before generation.
    #[error(transparent)]
    MissingFields(#[from] MissingFields),

    /// Reading or writing a file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A record or store file did not contain valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// Path of the offending file.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: impl AsRef<std::path::Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
