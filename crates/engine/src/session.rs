//! Identity session
//!
//! Maps a version record id to the content item built for it within one
//! unit of work. Two jobs:
//!
//! 1. Repeated resolution of the same version returns the same instance and
//!    does not replay the Loading/Loaded stages.
//! 2. Items are stored *before* their load stages run, so a handler that
//!    asks for the same item while it is loading (a circular reference)
//!    receives the in-progress shell instead of recursing.
//!
//! A session belongs to exactly one `UnitOfWork`. Reusing one across
//! unrelated operations would hand out stale items.

use std::collections::HashMap;

use folio_core::{FolioError, FolioResult, VersionRecordId};

use crate::item::ContentItem;

/// Identity map from version record id to item
#[derive(Debug, Default)]
pub struct IdentitySession {
    items: HashMap<VersionRecordId, ContentItem>,
}

impl IdentitySession {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Item previously stored for a version record, if any
    pub fn recall(&self, version_record_id: VersionRecordId) -> Option<ContentItem> {
        self.items.get(&version_record_id).cloned()
    }

    /// Remember an item under its version record id
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the item has no version record attached.
    pub fn store(&mut self, item: &ContentItem) -> FolioResult<()> {
        let version_id = item.version_id().ok_or_else(|| {
            FolioError::invalid_operation("cannot store a content item without a version record")
        })?;
        self.items.insert(version_id, item.clone());
        Ok(())
    }

    /// Check if a version record has an item in this session
    pub fn contains(&self, version_record_id: VersionRecordId) -> bool {
        self.items.contains_key(&version_record_id)
    }

    /// Number of items held
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the session holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Forget every item
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
