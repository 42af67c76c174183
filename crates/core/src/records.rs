//! Persisted record types
//!
//! These are the three record kinds the persistence collaborator stores:
//!
//! - `ContentTypeRecord`: a content type, by name
//! - `ContentItemRecord`: the durable identity of one item and its versions
//! - `ContentItemVersionRecord`: one snapshot of an item
//!
//! ## Sharing
//!
//! Records are handed out as `Shared<T>` handles. The repository, the item
//! record's version collection and every `ContentItem` built over a version
//! point at the same allocation, so a flag flipped by the manager is visible
//! through all of them without a write-back step.
//!
//! ## Invariants
//!
//! - Per item, at most one version has `latest == true`
//! - Per item, at most one version has `published == true`
//! - Version numbers start at 1, strictly increase and are never reused
//! - Versions are never physically deleted; removal only clears flags

use crate::types::{ContentItemId, ContentTypeId, VersionRecordId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Shared, interior-mutable handle to a record
pub type Shared<T> = Arc<RwLock<T>>;

/// Wrap a record in a new shared handle
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}

/// A record kind that can be stored in a `Repository`
pub trait Record: fmt::Debug + Send + Sync + 'static {
    /// Identity type of the record
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Human-readable record kind, used in logs and errors
    const KIND: &'static str;

    /// Identity of this record
    fn id(&self) -> Self::Id;
}

// =============================================================================
// ContentTypeRecord
// =============================================================================

/// A content type, identified by name
///
/// Created lazily the first time an item of an unseen type is created.
/// Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeRecord {
    /// Record identity
    pub id: ContentTypeId,
    /// Type name (exact-match key)
    pub name: String,
}

impl ContentTypeRecord {
    /// Create a new type record with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ContentTypeId::new(),
            name: name.into(),
        }
    }
}

impl Record for ContentTypeRecord {
    type Id = ContentTypeId;
    const KIND: &'static str = "content type";

    fn id(&self) -> ContentTypeId {
        self.id
    }
}

// =============================================================================
// ContentItemVersionRecord
// =============================================================================

/// One snapshot of a content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItemVersionRecord {
    /// Record identity
    pub id: VersionRecordId,
    /// Owning item (non-owning back reference)
    pub content_item_id: ContentItemId,
    /// Version number, starting at 1
    pub number: u32,
    /// Current working head of the item
    pub latest: bool,
    /// Live version of the item
    pub published: bool,
    /// Opaque payload owned by content handlers
    pub data: serde_json::Value,
}

impl ContentItemVersionRecord {
    /// Create an unflagged version with an empty payload
    pub fn new(content_item_id: ContentItemId, number: u32) -> Self {
        Self {
            id: VersionRecordId::new(),
            content_item_id,
            number,
            latest: false,
            published: false,
            data: serde_json::Value::Null,
        }
    }

    /// Latest and not published
    pub fn is_draft(&self) -> bool {
        self.latest && !self.published
    }
}

impl Record for ContentItemVersionRecord {
    type Id = VersionRecordId;
    const KIND: &'static str = "content item version";

    fn id(&self) -> VersionRecordId {
        self.id
    }
}

// =============================================================================
// ContentItemRecord
// =============================================================================

/// Durable identity of a content item plus its version collection
///
/// The `versions` collection holds the versions materialized on this record.
/// It may lag behind the version repository when records are loaded lazily,
/// which is why resolution falls back to the repository on a miss.
#[derive(Debug)]
pub struct ContentItemRecord {
    /// Record identity
    pub id: ContentItemId,
    /// Type of the item
    pub content_type: ContentTypeRecord,
    /// Materialized versions, in creation order
    pub versions: Vec<Shared<ContentItemVersionRecord>>,
}

impl ContentItemRecord {
    /// Create a record with no versions
    pub fn new(content_type: ContentTypeRecord) -> Self {
        Self {
            id: ContentItemId::new(),
            content_type,
            versions: Vec::new(),
        }
    }

    /// First materialized version matching the predicate
    pub fn find_version<F>(&self, predicate: F) -> Option<Shared<ContentItemVersionRecord>>
    where
        F: Fn(&ContentItemVersionRecord) -> bool,
    {
        self.versions.iter().find(|v| predicate(&*v.read())).cloned()
    }

    /// Version flagged latest, if materialized
    pub fn latest_version(&self) -> Option<Shared<ContentItemVersionRecord>> {
        self.find_version(|v| v.latest)
    }

    /// Version flagged published, if materialized
    pub fn published_version(&self) -> Option<Shared<ContentItemVersionRecord>> {
        self.find_version(|v| v.published)
    }

    /// Highest materialized version number (0 when there are none)
    pub fn max_number(&self) -> u32 {
        self.versions
            .iter()
            .map(|v| v.read().number)
            .max()
            .unwrap_or(0)
    }
}

impl Record for ContentItemRecord {
    type Id = ContentItemId;
    const KIND: &'static str = "content item";

    fn id(&self) -> ContentItemId {
        self.id
    }
}
