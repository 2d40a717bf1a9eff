//! Draft record and saved creditors driven by explicit commands.
//!
//! A [`Session`] holds what an interactive frontend edits: the draft
//! [`InvoiceRecord`] and the [`CreditorStore`].  Every user action is a
//! [`Command`] and every reaction is an [`Outcome`], so frontends only decide
//! how to present messages and confirmations.

use std::path::PathBuf;

use chrono::Local;
use log::{info, warn};

use crate::builder::PdfBuilder;
use crate::error::Error;
use crate::model::{InvoiceRecord, Party};
use crate::store::CreditorStore;

/// Shown when generation is requested with required fields empty.
pub const MISSING_FIELDS_MESSAGE: &str = "Por favor, preencha todos os campos obrigatórios: Nº da Duplicata, Valor, Vencimento e Nome do Sacado.";

/// Shown when a creditor without name or CNPJ/CPF is added.
pub const INCOMPLETE_CREDITOR_MESSAGE: &str = "Nome e CNPJ/CPF são obrigatórios.";

/// Question asked before a saved creditor is removed.
pub const REMOVE_CREDITOR_QUESTION: &str = "Tem certeza que deseja remover este credor?";

/// Produces the document for a validated record.
pub trait DocumentGenerator {
    /// Renders `record` and returns where the document was written.
    fn generate(&self, record: &InvoiceRecord) -> Result<PathBuf, Error>;
}

impl DocumentGenerator for PdfBuilder {
    fn generate(&self, record: &InvoiceRecord) -> Result<PathBuf, Error> {
        PdfBuilder::generate(self, record)
    }
}

/// A user action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Generate the document for the draft record.
    Generate,
    /// Copy the saved creditor at the index into the draft record.
    SelectCreditor(usize),
    /// Save a new reusable creditor.
    AddCreditor(Party),
    /// Remove the saved creditor at `index` once `confirmed`.
    RemoveCreditor {
        /// Position in the creditor list.
        index: usize,
        /// Whether the user already confirmed the removal.
        confirmed: bool,
    },
}

/// The reaction to a [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The document was written to `path`.
    Generated {
        /// Location of the written document.
        path: PathBuf,
    },
    /// The command was refused; `message` is meant for the user.
    Blocked {
        /// Message to show.
        message: String,
    },
    /// The command has to be repeated with confirmation.
    ConfirmationRequired {
        /// Question to ask.
        question: String,
    },
    /// The draft creditor was replaced.
    CreditorSelected(Party),
    /// A creditor was saved.
    CreditorAdded(Party),
    /// A saved creditor was removed.
    CreditorRemoved(Party),
    /// The command failed unexpectedly.
    Failed {
        /// Description of the failure.
        message: String,
    },
}

/// Draft record plus saved creditors.
pub struct Session<G = PdfBuilder> {
    record: InvoiceRecord,
    store: CreditorStore,
    generator: G,
}

impl<G: DocumentGenerator> Session<G> {
    /// Creates a session with an empty draft issued today.
    pub fn new(store: CreditorStore, generator: G) -> Self {
        let record = InvoiceRecord {
            issue_date: today(),
            ..InvoiceRecord::default()
        };
        Self {
            record,
            store,
            generator,
        }
    }

    /// Replaces the draft with `record`.
    pub fn with_record(mut self, record: InvoiceRecord) -> Self {
        self.record = record;
        self
    }

    /// The draft record.
    pub fn record(&self) -> &InvoiceRecord {
        &self.record
    }

    /// Mutable access to the draft record for field edits.
    pub fn record_mut(&mut self) -> &mut InvoiceRecord {
        &mut self.record
    }

    /// The saved creditors.
    pub fn store(&self) -> &CreditorStore {
        &self.store
    }

    /// Applies `command` and reports what happened.
    pub fn handle(&mut self, command: Command) -> Outcome {
        match command {
            Command::Generate => self.generate(),
            Command::SelectCreditor(index) => match self.store.get(index) {
                Some(creditor) => {
                    self.record.creditor = creditor.clone();
                    Outcome::CreditorSelected(creditor.clone())
                }
                None => no_such_creditor(index),
            },
            Command::AddCreditor(creditor) => {
                if !creditor.is_storable() {
                    return Outcome::Blocked {
                        message: INCOMPLETE_CREDITOR_MESSAGE.to_owned(),
                    };
                }
                self.store.add(creditor.clone());
                Outcome::CreditorAdded(creditor)
            }
            Command::RemoveCreditor { index, confirmed } => {
                if self.store.get(index).is_none() {
                    return no_such_creditor(index);
                }
                if !confirmed {
                    return Outcome::ConfirmationRequired {
                        question: REMOVE_CREDITOR_QUESTION.to_owned(),
                    };
                }
                match self.store.remove(index) {
                    Some(creditor) => Outcome::CreditorRemoved(creditor),
                    None => no_such_creditor(index),
                }
            }
        }
    }

    fn generate(&self) -> Outcome {
        if let Err(missing) = self.record.validate() {
            info!("Generation blocked: {}", missing);
            return Outcome::Blocked {
                message: MISSING_FIELDS_MESSAGE.to_owned(),
            };
        }
        match self.generator.generate(&self.record) {
            Ok(path) => Outcome::Generated { path },
            Err(err) => {
                warn!("Generation failed: {}", err);
                Outcome::Failed {
                    message: err.to_string(),
                }
            }
        }
    }
}

fn no_such_creditor(index: usize) -> Outcome {
    Outcome::Failed {
        message: format!("no saved creditor at position {}", index),
    }
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
