//! Stage contexts
//!
//! One context value is built per stage sweep and handed mutably to every
//! handler in turn, so later handlers see what earlier ones changed.
//! Record handles in a context are the same handles the orchestrator
//! mutates; a handler that writes through them changes persisted state.

use folio_core::{
    ContentItemId, ContentItemRecord, ContentItemVersionRecord, ContentTypeDefinition, Shared,
};
use serde_json::Value;

use crate::index::DocumentIndex;
use crate::item::{ContentItem, ContentItemBuilder};
use crate::metadata::ContentItemMetadata;
use crate::shape::Shape;

// =============================================================================
// Construction
// =============================================================================

/// Activating: parts are welded onto a builder
#[derive(Debug)]
pub struct ActivatingContentContext {
    /// Content type name
    pub content_type: String,
    /// Definition the item is built from
    pub definition: ContentTypeDefinition,
    /// Builder receiving parts
    pub builder: ContentItemBuilder,
}

/// Activated: the item instance exists
#[derive(Debug)]
pub struct ActivatedContentContext {
    /// Content type name
    pub content_type: String,
    /// The new item
    pub item: ContentItem,
}

/// Initializing: defaults are applied
#[derive(Debug)]
pub struct InitializingContentContext {
    /// Content type name
    pub content_type: String,
    /// The new item
    pub item: ContentItem,
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Creating/Created
#[derive(Debug)]
pub struct CreateContentContext {
    /// Item being created
    pub item: ContentItem,
    /// Its new item record
    pub record: Shared<ContentItemRecord>,
    /// Its first version record
    pub version: Shared<ContentItemVersionRecord>,
}

/// Loading/Loaded
#[derive(Debug)]
pub struct LoadContentContext {
    /// Item being loaded
    pub item: ContentItem,
    /// Item record
    pub record: Shared<ContentItemRecord>,
    /// Version record the item represents
    pub version: Shared<ContentItemVersionRecord>,
}

/// Versioning/Versioned
#[derive(Debug)]
pub struct VersionContentContext {
    /// Item id shared by both versions
    pub id: ContentItemId,
    /// Content type name
    pub content_type: String,
    /// Item record
    pub record: Shared<ContentItemRecord>,
    /// Item the new version is forked from
    pub existing_item: ContentItem,
    /// Item wrapping the new version
    pub building_item: ContentItem,
    /// Version forked from
    pub existing_version: Shared<ContentItemVersionRecord>,
    /// New version
    pub building_version: Shared<ContentItemVersionRecord>,
}

/// Publishing/Published, for both publish and unpublish
#[derive(Debug)]
pub struct PublishContentContext {
    /// Item passed to publish or unpublish
    pub item: ContentItem,
    /// Version that was published before the transition
    pub previous: Option<Shared<ContentItemVersionRecord>>,
    /// Version becoming published; None when unpublishing
    pub publishing: Option<Shared<ContentItemVersionRecord>>,
}

impl PublishContentContext {
    /// Whether this transition removes the published version
    pub fn is_unpublish(&self) -> bool {
        self.publishing.is_none()
    }
}

/// Removing/Removed
#[derive(Debug)]
pub struct RemoveContentContext {
    /// Item being removed
    pub item: ContentItem,
    /// Versions flagged latest or published before removal
    pub versions: Vec<Shared<ContentItemVersionRecord>>,
}

// =============================================================================
// Pass-throughs
// =============================================================================

/// Indexing/Indexed
pub struct IndexContentContext<'a> {
    /// Item being indexed
    pub item: ContentItem,
    /// Document receiving fields
    pub document: &'a mut dyn DocumentIndex,
}

impl std::fmt::Debug for IndexContentContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexContentContext")
            .field("item", &self.item)
            .finish_non_exhaustive()
    }
}

/// GetContentItemMetadata
#[derive(Debug)]
pub struct GetContentItemMetadataContext {
    /// Item described
    pub item: ContentItem,
    /// Metadata, pre-filled with defaults
    pub metadata: ContentItemMetadata,
}

/// BuildDisplayShape
#[derive(Debug)]
pub struct BuildDisplayContext {
    /// Item displayed
    pub item: ContentItem,
    /// Root shape
    pub shape: Shape,
    /// Display type, e.g. "Detail" or "Summary"
    pub display_type: String,
}

/// BuildEditorShape
#[derive(Debug)]
pub struct BuildEditorContext {
    /// Item edited
    pub item: ContentItem,
    /// Root shape
    pub shape: Shape,
}

/// UpdateEditorShape
#[derive(Debug)]
pub struct UpdateEditorContext {
    /// Item edited
    pub item: ContentItem,
    /// Root shape
    pub shape: Shape,
    /// Posted editor values, keyed by part then field
    pub updates: Value,
}
