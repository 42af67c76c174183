//! Content handlers
//!
//! A handler observes lifecycle transitions. It implements one method per
//! stage; every method has a no-op default, so a handler only overrides the
//! stages it cares about.
//!
//! ## Design
//!
//! - Handlers are registered explicitly, in order, when the `ContentManager`
//!   is built. Nothing is discovered at runtime.
//! - Each method receives the stage context mutably and the current
//!   `UnitOfWork`, so a handler can load related items (sharing the identity
//!   session) while it runs.
//! - Returning an error vetoes the operation. The error reaches the caller
//!   unchanged; nothing already applied is rolled back.

use std::fmt;

use folio_core::FolioResult;

use crate::context::{
    ActivatedContentContext, ActivatingContentContext, BuildDisplayContext, BuildEditorContext,
    CreateContentContext, GetContentItemMetadataContext, IndexContentContext,
    InitializingContentContext, LoadContentContext, PublishContentContext, RemoveContentContext,
    UpdateEditorContext, VersionContentContext,
};
use crate::manager::UnitOfWork;

/// Lifecycle stage a handler can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Parts are being welded onto a new item
    Activating,
    /// The item instance exists
    Activated,
    /// Defaults are being applied
    Initializing,
    /// A new item is being persisted
    Creating,
    /// A new item was persisted
    Created,
    /// A version is being loaded
    Loading,
    /// A version was loaded
    Loaded,
    /// A new version is being forked
    Versioning,
    /// A new version was forked
    Versioned,
    /// A version is being published or unpublished
    Publishing,
    /// A version was published or unpublished
    Published,
    /// An item is being removed
    Removing,
    /// An item was removed
    Removed,
    /// An item is being indexed
    Indexing,
    /// An item was indexed
    Indexed,
    /// Item metadata is being collected
    GetContentItemMetadata,
    /// A display shape is being built
    BuildDisplayShape,
    /// An editor shape is being built
    BuildEditorShape,
    /// An editor shape is being updated
    UpdateEditorShape,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Activating => "activating",
            Stage::Activated => "activated",
            Stage::Initializing => "initializing",
            Stage::Creating => "creating",
            Stage::Created => "created",
            Stage::Loading => "loading",
            Stage::Loaded => "loaded",
            Stage::Versioning => "versioning",
            Stage::Versioned => "versioned",
            Stage::Publishing => "publishing",
            Stage::Published => "published",
            Stage::Removing => "removing",
            Stage::Removed => "removed",
            Stage::Indexing => "indexing",
            Stage::Indexed => "indexed",
            Stage::GetContentItemMetadata => "get_content_item_metadata",
            Stage::BuildDisplayShape => "build_display_shape",
            Stage::BuildEditorShape => "build_editor_shape",
            Stage::UpdateEditorShape => "update_editor_shape",
        };
        f.write_str(name)
    }
}

/// Observer of content lifecycle stages
///
/// All stage methods default to doing nothing.
#[allow(unused_variables)]
pub trait ContentHandler: Send + Sync {
    /// Name used in logs and handler errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Weld parts onto the item builder
    fn activating(
        &self,
        ctx: &mut ActivatingContentContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Wire up the freshly built item
    fn activated(
        &self,
        ctx: &mut ActivatedContentContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Apply defaults to the new item
    fn initializing(
        &self,
        ctx: &mut InitializingContentContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Before the first version is persisted
    fn creating(&self, ctx: &mut CreateContentContext, work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        Ok(())
    }

    /// After the first version is persisted
    fn created(&self, ctx: &mut CreateContentContext, work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        Ok(())
    }

    /// Populate the item from its version record
    fn loading(&self, ctx: &mut LoadContentContext, work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        Ok(())
    }

    /// After every handler has loaded the item
    fn loaded(&self, ctx: &mut LoadContentContext, work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        Ok(())
    }

    /// Carry state from the existing version to the building one
    fn versioning(
        &self,
        ctx: &mut VersionContentContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// After a new version was forked
    fn versioned(
        &self,
        ctx: &mut VersionContentContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Before the published flag moves; `ctx.publishing` is None on unpublish
    fn publishing(
        &self,
        ctx: &mut PublishContentContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// After the published flag moved
    fn published(
        &self,
        ctx: &mut PublishContentContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Before the latest and published flags are cleared
    fn removing(&self, ctx: &mut RemoveContentContext, work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        Ok(())
    }

    /// After the flags were cleared
    fn removed(&self, ctx: &mut RemoveContentContext, work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        Ok(())
    }

    /// Add the item's fields to an index document
    fn indexing(
        &self,
        ctx: &mut IndexContentContext<'_>,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// After every handler has indexed the item
    fn indexed(
        &self,
        ctx: &mut IndexContentContext<'_>,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Refine display text, identity and routes
    fn get_content_item_metadata(
        &self,
        ctx: &mut GetContentItemMetadataContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Populate a display shape
    fn build_display_shape(
        &self,
        ctx: &mut BuildDisplayContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Populate an editor shape
    fn build_editor_shape(
        &self,
        ctx: &mut BuildEditorContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }

    /// Apply posted editor values to the item
    fn update_editor_shape(
        &self,
        ctx: &mut UpdateEditorContext,
        work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Ok(())
    }
}
