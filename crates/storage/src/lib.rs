//! Storage layer for Folio
//!
//! This crate provides reference implementations of the collaborator traits
//! defined in `folio-core`:
//! - InMemoryRepository: insertion-ordered `Repository` with RwLock
//! - InMemoryDefinitionStore: `ContentDefinitionManager` over a BTreeMap
//! - ContentStore: the three repositories a content manager needs
//!
//! Physical persistence (SQL, document stores, ...) plugs in by implementing
//! the same traits; the engine does not depend on this crate's types beyond
//! its default wiring.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod definitions;
pub mod memory;

use std::sync::Arc;

use folio_core::{
    ContentItemRecord, ContentItemVersionRecord, ContentTypeRecord, FolioResult, Repository,
};

pub use definitions::InMemoryDefinitionStore;
pub use memory::InMemoryRepository;

/// The three repositories backing a content manager
///
/// Cloning is cheap; clones share the same repositories.
#[derive(Clone)]
pub struct ContentStore {
    /// Content type records
    pub types: Arc<dyn Repository<ContentTypeRecord>>,
    /// Content item records
    pub items: Arc<dyn Repository<ContentItemRecord>>,
    /// Content item version records
    pub versions: Arc<dyn Repository<ContentItemVersionRecord>>,
}

impl ContentStore {
    /// Assemble a store from existing repositories
    pub fn new(
        types: Arc<dyn Repository<ContentTypeRecord>>,
        items: Arc<dyn Repository<ContentItemRecord>>,
        versions: Arc<dyn Repository<ContentItemVersionRecord>>,
    ) -> Self {
        Self {
            types,
            items,
            versions,
        }
    }

    /// Store backed by fresh in-memory repositories
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryRepository::<ContentTypeRecord>::new()),
            Arc::new(InMemoryRepository::<ContentItemRecord>::new()),
            Arc::new(InMemoryRepository::<ContentItemVersionRecord>::new()),
        )
    }

    /// Flush type, item and version repositories, in that order
    ///
    /// # Errors
    ///
    /// Returns the first repository error; later repositories are not flushed.
    pub fn flush(&self) -> FolioResult<()> {
        self.types.flush()?;
        self.items.flush()?;
        self.versions.flush()
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store_flush() {
        let store = ContentStore::in_memory();
        store.types.create(ContentTypeRecord::new("page")).unwrap();
        assert!(store.flush().is_ok());
    }

    #[test]
    fn test_clones_share_repositories() {
        let store = ContentStore::in_memory();
        let clone = store.clone();
        let handle = store.types.create(ContentTypeRecord::new("page")).unwrap();
        let id = handle.read().id;
        assert!(clone.types.get(id).unwrap().is_some());
    }
}
