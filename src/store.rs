//! Saved creditors, kept as a JSON array on disk.
//!
//! The store never fails its callers: an unreadable or corrupt file opens as
//! an empty list, and a failed write leaves the in-memory list updated.  Both
//! cases are logged as warnings.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;
use crate::model::Party;

/// Environment variable overriding the location of the creditor file.
pub const CREDITORS_FILE_ENV: &str = "DUPLICATA_CREDITORS_FILE";

const APP_DIR: &str = "duplicata";
const CREDITORS_FILE_NAME: &str = "creditors.json";

/// Location of the creditor file when none is given explicitly.
///
/// Uses `DUPLICATA_CREDITORS_FILE` when set, then the user data directory,
/// then the current directory.
pub fn default_store_path() -> PathBuf {
    if let Some(path) = env::var_os(CREDITORS_FILE_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_default()
        .join(CREDITORS_FILE_NAME)
}

/// Ordered list of reusable creditors backed by a JSON file.
#[derive(Clone, Debug)]
pub struct CreditorStore {
    path: PathBuf,
    creditors: Vec<Party>,
}

impl CreditorStore {
    /// Opens the store at `path`, starting empty when the file is missing or invalid.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let creditors = match read_creditors(&path) {
            Ok(creditors) => creditors,
            Err(err) => {
                warn!("Starting with no saved creditors: {}", err);
                Vec::new()
            }
        };
        debug!(
            "Opened creditor store {} ({} entries)",
            path.display(),
            creditors.len()
        );
        Self { path, creditors }
    }

    /// Opens the store at [`default_store_path`].
    pub fn open_default() -> Self {
        Self::open(default_store_path())
    }

    /// File backing the store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved creditors in insertion order.
    pub fn list(&self) -> &[Party] {
        &self.creditors
    }

    /// Returns the creditor at `index`.
    pub fn get(&self, index: usize) -> Option<&Party> {
        self.creditors.get(index)
    }

    /// Number of saved creditors.
    pub fn len(&self) -> usize {
        self.creditors.len()
    }

    /// Whether no creditor is saved.
    pub fn is_empty(&self) -> bool {
        self.creditors.is_empty()
    }

    /// Appends `creditor` and persists the list.
    pub fn add(&mut self, creditor: Party) {
        self.creditors.push(creditor);
        self.persist();
    }

    /// Removes the creditor at `index` and persists the list.
    ///
    /// Returns `None` and leaves the store untouched when `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Option<Party> {
        if index >= self.creditors.len() {
            return None;
        }
        let removed = self.creditors.remove(index);
        self.persist();
        Some(removed)
    }

    fn persist(&self) {
        if let Err(err) = write_creditors(&self.path, &self.creditors) {
            warn!("Saved creditors were not written: {}", err);
        }
    }
}

fn read_creditors(path: &Path) -> Result<Vec<Party>, Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&contents).map_err(|err| Error::json(path, err))
}

fn write_creditors(path: &Path, creditors: &[Party]) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
    }
    let json = serde_json::to_string_pretty(creditors).map_err(|err| Error::json(path, err))?;
    fs::write(path, json).map_err(|err| Error::io(path, err))
}
