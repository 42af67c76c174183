//! Index sink
//!
//! `DocumentIndex` is what handlers write to during Indexing. Populating a
//! real search index is the implementor's concern; `IndexDocument` is a
//! plain in-memory document for callers that just want the fields.

use std::collections::BTreeMap;

use folio_core::ContentItemId;
use serde::Serialize;
use serde_json::Value;

/// Receives an item's indexable fields
pub trait DocumentIndex: Send {
    /// Identify the item the document describes
    fn set_content_item_id(&mut self, id: ContentItemId);

    /// Add a field; adding a name twice collects the values into an array
    fn add(&mut self, name: &str, value: Value);
}

/// In-memory index document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexDocument {
    /// Item the document describes
    pub content_item_id: Option<ContentItemId>,
    /// Indexed fields by name
    pub fields: BTreeMap<String, Value>,
}

impl IndexDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl DocumentIndex for IndexDocument {
    fn set_content_item_id(&mut self, id: ContentItemId) {
        self.content_item_id = Some(id);
    }

    fn add(&mut self, name: &str, value: Value) {
        match self.fields.get_mut(name) {
            None => {
                self.fields.insert(name.to_string(), value);
            }
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
}
