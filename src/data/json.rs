use super::{deserialize, to_string, Repository, StoreError};
use crate::core::{Catalog, Lesson};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Repository backed by a JSON document on disk.
///
/// The document is loaded once when the store is opened. Writes go to a
/// temporary file next to the document which is then renamed over it.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    catalog: Catalog,
}

impl JsonStore {
    /// Opens the store at the given path.
    ///
    /// # Errors
    /// - If the file cannot be read.
    /// - If the document is malformed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let catalog = deserialize(&mut BufReader::new(File::open(&path)?))?;
        log::debug!("Opened store {}", path.display());
        Ok(Self { path, catalog })
    }

    /// Creates a store at the given path holding the given catalog.
    /// An existing document is replaced.
    ///
    /// # Errors
    /// - If the document cannot be written.
    pub fn create(path: impl Into<PathBuf>, catalog: Catalog) -> Result<Self, StoreError> {
        let store = Self { path: path.into(), catalog };
        store.write()?;
        Ok(store)
    }

    /// Returns the path of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), StoreError> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(directory)?;
        file.write_all(to_string(&self.catalog)?.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;
        Ok(())
    }
}

impl Repository for JsonStore {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn replace_lessons(&mut self, lessons: Vec<Lesson>) -> Result<(), StoreError> {
        let previous = std::mem::replace(&mut self.catalog.lessons, lessons);

        if let Err(err) = self.write() {
            log::error!("Failed to write {}: {err}", self.path.display());
            self.catalog.lessons = previous;
            return Err(err);
        }

        log::info!(
            "Stored {} lessons in {}",
            self.catalog.lessons.len(),
            self.path.display()
        );
        Ok(())
    }
}
