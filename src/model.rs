//! Data structures describing the content of a duplicata.
//!
//! Plain serde values.  Nothing here touches `genpdf`; records are read from
//! JSON files and parties are kept in the creditor store as they are.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Placement of text relative to its anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

/// One of the two legal actors on the bill.
///
/// Absent values are empty strings; no field is independently optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Party {
    /// Display or legal entity name.
    pub name: String,
    /// CNPJ or CPF, kept as typed.
    pub doc: String,
    /// Street, number and district.
    pub address: String,
    /// Municipality.
    pub city: String,
    /// Two-letter state code (UF).
    pub state: String,
    /// Postal code (CEP).
    pub zip: String,
}

impl Party {
    /// Creates a party with the given name and every other field empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the CNPJ/CPF and returns the updated party.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Sets the street address and returns the updated party.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets city, state and postal code and returns the updated party.
    pub fn with_locality(
        mut self,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        self.city = city.into();
        self.state = state.into();
        self.zip = zip.into();
        self
    }

    /// Whether the party carries the minimum needed to be kept as a reusable creditor.
    pub fn is_storable(&self) -> bool {
        !self.name.is_empty() && !self.doc.is_empty()
    }
}

/// The complete subject of one generated document.
///
/// Records are built fresh for each generation request and never mutated by the
/// layout engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Issuing party owed the payment.
    pub creditor: Party,
    /// Party obligated to pay.
    pub debtor: Party,
    /// The bill's own number.
    pub number: String,
    /// Number of the underlying commercial invoice.
    pub invoice_number: String,
    /// ISO `YYYY-MM-DD` issue date.
    pub issue_date: String,
    /// ISO `YYYY-MM-DD` due date.
    pub due_date: String,
    /// Amount as typed, with `,` or `.` as decimal separator.
    pub value: String,
    /// Place of payment.
    pub payment_place: String,
}

/// File name used when the record has no number.
pub const UNNUMBERED_FILE_STEM: &str = "sem-numero";

impl InvoiceRecord {
    /// Reads a record from a camelCase JSON file.  Absent fields are empty.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        serde_json::from_str(&contents).map_err(|err| Error::json(path, err))
    }

    /// Returns the file name the rendered document is saved under.
    ///
    /// Characters that would escape a single path component are replaced by `-`.
    pub fn output_file_name(&self) -> String {
        let number = if self.number.is_empty() {
            UNNUMBERED_FILE_STEM.to_owned()
        } else {
            self.number
                .chars()
                .map(|c| match c {
                    '/' | '\\' => '-',
                    c if c.is_control() => '-',
                    c => c,
                })
                .collect()
        };
        format!("duplicata-{}.pdf", number)
    }

    /// Lists the required fields that are still empty, in form order.
    pub fn missing_required_fields(&self) -> Vec<RequiredField> {
        let checks = [
            (RequiredField::Number, &self.number),
            (RequiredField::Value, &self.value),
            (RequiredField::DueDate, &self.due_date),
            (RequiredField::DebtorName, &self.debtor.name),
        ];
        checks
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }

    /// Checks the fields a caller must fill before asking for a document.
    pub fn validate(&self) -> Result<(), MissingFields> {
        let missing = self.missing_required_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingFields { fields: missing })
        }
    }
}

/// Fields that must be filled before a document is generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequiredField {
    /// Nº da Duplicata.
    Number,
    /// Valor.
    Value,
    /// Vencimento.
    DueDate,
    /// Nome do Sacado.
    DebtorName,
}

impl RequiredField {
    /// Label shown to the person filling the form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Number => "Nº da Duplicata",
            Self::Value => "Valor",
            Self::DueDate => "Vencimento",
            Self::DebtorName => "Nome do Sacado",
        }
    }
}

/// Validation failure listing every required field left empty.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("campos obrigatórios não preenchidos: {}", labels(.fields))]
pub struct MissingFields {
    fields: Vec<RequiredField>,
}

impl MissingFields {
    /// Returns the missing fields in form order.
    pub fn fields(&self) -> &[RequiredField] {
        &self.fields
    }
}

fn labels(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}
