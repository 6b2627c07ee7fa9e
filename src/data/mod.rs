mod json;
mod memory;

use crate::core::{Catalog, Lesson};
use std::io::BufRead;
use thiserror::Error;

pub use json::JsonStore;
pub use memory::MemoryStore;

/// Errors raised by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store document is malformed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("could not replace store document: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("store rejected the write: {0}")]
    Rejected(String),
}

/// Access to the entities the composer reads and the lesson table it writes.
///
/// Reads are served from a loaded snapshot. A repository is owned by a single
/// run at a time and must not be shared with the host while the run executes.
pub trait Repository {
    /// Returns the loaded entity snapshot.
    fn catalog(&self) -> &Catalog;

    /// Replaces every stored lesson row with the given rows.
    /// Either all rows are stored or the previous table is kept intact.
    ///
    /// # Errors
    /// - If the store could not be written.
    fn replace_lessons(&mut self, lessons: Vec<Lesson>) -> Result<(), StoreError>;
}

/// Reads a catalog document.
///
/// # Errors
/// - If the reader fails or the document is malformed.
pub fn deserialize(reader: &mut impl BufRead) -> Result<Catalog, StoreError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Writes a catalog document.
///
/// # Errors
/// - If the catalog cannot be serialized.
pub fn to_string(catalog: &Catalog) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(catalog)?)
}
