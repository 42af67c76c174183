//! In-memory content definition store
//!
//! Holds `ContentTypeDefinition`s keyed by type name and serves them through
//! the `ContentDefinitionManager` trait. Listing is ordered by name.

use std::collections::BTreeMap;

use folio_core::{ContentDefinitionManager, ContentTypeDefinition};
use parking_lot::RwLock;
use tracing::debug;

/// Definition store backed by a `BTreeMap`
#[derive(Debug, Default)]
pub struct InMemoryDefinitionStore {
    types: RwLock<BTreeMap<String, ContentTypeDefinition>>,
}

impl InMemoryDefinitionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given definitions
    pub fn with_definitions(definitions: impl IntoIterator<Item = ContentTypeDefinition>) -> Self {
        let store = Self::new();
        for definition in definitions {
            store.store_type_definition(definition);
        }
        store
    }

    /// Add or replace a type definition
    pub fn store_type_definition(&self, definition: ContentTypeDefinition) {
        debug!(content_type = %definition.name, parts = definition.parts.len(), "Stored type definition");
        self.types
            .write()
            .insert(definition.name.clone(), definition);
    }

    /// Remove a type definition, returning it if it existed
    pub fn remove_type_definition(&self, name: &str) -> Option<ContentTypeDefinition> {
        self.types.write().remove(name)
    }
}

impl ContentDefinitionManager for InMemoryDefinitionStore {
    fn get_type_definition(&self, name: &str) -> Option<ContentTypeDefinition> {
        self.types.read().get(name).cloned()
    }

    fn list_type_definitions(&self) -> Vec<ContentTypeDefinition> {
        self.types.read().values().cloned().collect()
    }
}
