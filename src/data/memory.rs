use super::{Repository, StoreError};
use crate::core::{Catalog, Lesson};

/// Repository kept entirely in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    catalog: Catalog,
}

impl MemoryStore {
    #[must_use]
    pub const fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Consumes the store and returns its catalog.
    #[must_use]
    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }
}

impl Repository for MemoryStore {
    fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn replace_lessons(&mut self, lessons: Vec<Lesson>) -> Result<(), StoreError> {
        self.catalog.lessons = lessons;
        Ok(())
    }
}
