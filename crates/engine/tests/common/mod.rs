//! Shared test utilities for engine integration tests.
//!
//! Import via `mod common;`.

#![allow(dead_code)]

use std::sync::Arc;

use folio_core::{ContentItemVersionRecord, FolioError, FolioResult, Shared};
use folio_engine::*;
use parking_lot::Mutex;

// ============================================================================
// Recorded events
// ============================================================================

/// One stage invocation seen by a `RecordingHandler`
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Handler that saw it
    pub handler: String,
    /// Stage
    pub stage: Stage,
    /// Number of the context's main version, if any
    pub number: Option<u32>,
    /// (number, latest, published) of versions carried by the context
    pub versions: Vec<(u32, bool, bool)>,
    /// Publishing/Published only: whether this is an unpublish
    pub unpublish: bool,
}

/// Shared event log
pub type Log = Arc<Mutex<Vec<Event>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Number of events for a stage
pub fn count(log: &Log, stage: Stage) -> usize {
    log.lock().iter().filter(|e| e.stage == stage).count()
}

/// Stages in the order they were seen
pub fn stages(log: &Log) -> Vec<Stage> {
    log.lock().iter().map(|e| e.stage).collect()
}

/// Events for a stage
pub fn events(log: &Log, stage: Stage) -> Vec<Event> {
    log.lock().iter().filter(|e| e.stage == stage).cloned().collect()
}

fn flags(version: &Shared<ContentItemVersionRecord>) -> (u32, bool, bool) {
    let v = version.read();
    (v.number, v.latest, v.published)
}

// ============================================================================
// RecordingHandler
// ============================================================================

/// Handler that records every stage it sees
pub struct RecordingHandler {
    name: String,
    log: Log,
}

impl RecordingHandler {
    pub fn new(name: &str, log: Log) -> Self {
        Self {
            name: name.to_string(),
            log,
        }
    }

    fn record(&self, stage: Stage, number: Option<u32>, versions: Vec<(u32, bool, bool)>) {
        self.push(stage, number, versions, false);
    }

    fn push(
        &self,
        stage: Stage,
        number: Option<u32>,
        versions: Vec<(u32, bool, bool)>,
        unpublish: bool,
    ) {
        self.log.lock().push(Event {
            handler: self.name.clone(),
            stage,
            number,
            versions,
            unpublish,
        });
    }

    fn publish_event(&self, stage: Stage, ctx: &PublishContentContext) {
        let versions = ctx
            .previous
            .iter()
            .chain(ctx.publishing.iter())
            .map(flags)
            .collect();
        self.push(stage, ctx.item.number(), versions, ctx.is_unpublish());
    }
}

impl ContentHandler for RecordingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn activating(
        &self,
        _ctx: &mut ActivatingContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::Activating, None, Vec::new());
        Ok(())
    }

    fn activated(
        &self,
        ctx: &mut ActivatedContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::Activated, ctx.item.number(), Vec::new());
        Ok(())
    }

    fn initializing(
        &self,
        ctx: &mut InitializingContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::Initializing, ctx.item.number(), Vec::new());
        Ok(())
    }

    fn creating(&self, ctx: &mut CreateContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        self.record(Stage::Creating, ctx.item.number(), vec![flags(&ctx.version)]);
        Ok(())
    }

    fn created(&self, ctx: &mut CreateContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        self.record(Stage::Created, ctx.item.number(), vec![flags(&ctx.version)]);
        Ok(())
    }

    fn loading(&self, ctx: &mut LoadContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        self.record(Stage::Loading, ctx.item.number(), vec![flags(&ctx.version)]);
        Ok(())
    }

    fn loaded(&self, ctx: &mut LoadContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        self.record(Stage::Loaded, ctx.item.number(), vec![flags(&ctx.version)]);
        Ok(())
    }

    fn versioning(
        &self,
        ctx: &mut VersionContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        let versions = vec![flags(&ctx.existing_version), flags(&ctx.building_version)];
        self.record(Stage::Versioning, ctx.building_item.number(), versions);
        Ok(())
    }

    fn versioned(
        &self,
        ctx: &mut VersionContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        let versions = vec![flags(&ctx.existing_version), flags(&ctx.building_version)];
        self.record(Stage::Versioned, ctx.building_item.number(), versions);
        Ok(())
    }

    fn publishing(
        &self,
        ctx: &mut PublishContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.publish_event(Stage::Publishing, ctx);
        Ok(())
    }

    fn published(
        &self,
        ctx: &mut PublishContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.publish_event(Stage::Published, ctx);
        Ok(())
    }

    fn removing(&self, ctx: &mut RemoveContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        let versions = ctx.versions.iter().map(flags).collect();
        self.record(Stage::Removing, ctx.item.number(), versions);
        Ok(())
    }

    fn removed(&self, ctx: &mut RemoveContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        let versions = ctx.versions.iter().map(flags).collect();
        self.record(Stage::Removed, ctx.item.number(), versions);
        Ok(())
    }

    fn indexing(
        &self,
        ctx: &mut IndexContentContext<'_>,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::Indexing, ctx.item.number(), Vec::new());
        Ok(())
    }

    fn indexed(
        &self,
        ctx: &mut IndexContentContext<'_>,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::Indexed, ctx.item.number(), Vec::new());
        Ok(())
    }

    fn get_content_item_metadata(
        &self,
        ctx: &mut GetContentItemMetadataContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::GetContentItemMetadata, ctx.item.number(), Vec::new());
        Ok(())
    }

    fn build_display_shape(
        &self,
        ctx: &mut BuildDisplayContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::BuildDisplayShape, ctx.item.number(), Vec::new());
        Ok(())
    }

    fn build_editor_shape(
        &self,
        ctx: &mut BuildEditorContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::BuildEditorShape, ctx.item.number(), Vec::new());
        Ok(())
    }

    fn update_editor_shape(
        &self,
        ctx: &mut UpdateEditorContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.record(Stage::UpdateEditorShape, ctx.item.number(), Vec::new());
        Ok(())
    }
}

// ============================================================================
// VetoHandler
// ============================================================================

/// Handler that fails in one stage
pub struct VetoHandler {
    pub stage: Stage,
}

impl VetoHandler {
    fn check(&self, stage: Stage) -> FolioResult<()> {
        if stage == self.stage {
            Err(FolioError::handler("veto", format!("{} rejected", stage)))
        } else {
            Ok(())
        }
    }
}

impl ContentHandler for VetoHandler {
    fn name(&self) -> &str {
        "veto"
    }

    fn activating(
        &self,
        _ctx: &mut ActivatingContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.check(Stage::Activating)
    }

    fn creating(&self, _ctx: &mut CreateContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        self.check(Stage::Creating)
    }

    fn loading(&self, _ctx: &mut LoadContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        self.check(Stage::Loading)
    }

    fn publishing(
        &self,
        _ctx: &mut PublishContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        self.check(Stage::Publishing)
    }

    fn removing(&self, _ctx: &mut RemoveContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        self.check(Stage::Removing)
    }
}

// ============================================================================
// Managers
// ============================================================================

/// Manager with one recording handler
pub fn recording_manager() -> (ContentManager, Log) {
    let log = new_log();
    let manager = ContentManager::builder()
        .handler(RecordingHandler::new("recorder", log.clone()))
        .build()
        .unwrap();
    (manager, log)
}

/// Manager with the given handlers, in order
pub fn manager_with(handlers: Vec<Arc<dyn ContentHandler>>) -> ContentManager {
    handlers
        .into_iter()
        .fold(ContentManager::builder(), |builder, h| builder.handler_arc(h))
        .build()
        .unwrap()
}

/// Version flags of every version of an item, ascending by number
pub fn version_flags(manager: &ContentManager, item: &ContentItem) -> Vec<(u32, bool, bool)> {
    let record = item.record().unwrap();
    folio_engine::resolver::all_versions(&record, manager.store().versions.as_ref())
        .unwrap()
        .iter()
        .map(flags)
        .collect()
}
