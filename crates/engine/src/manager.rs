//! Content manager and unit of work
//!
//! `ContentManager` is long-lived: it owns the store, the definition
//! source, the handler pipeline and the configuration. All lifecycle
//! operations run on a `UnitOfWork`, obtained from `ContentManager::begin`,
//! which owns one identity session.
//!
//! ## Design
//!
//! - One unit of work per logical operation boundary (a request, a batch).
//!   Drop it afterwards; reusing it across unrelated operations hands out
//!   stale items.
//! - Items do not point back to the manager. Handlers receive the unit of
//!   work explicitly and load related items through it.
//! - Records are mutated in place through their shared handles. There is no
//!   locking protocol around content type acquisition or the latest and
//!   published flag flips: two units of work touching the same item, or
//!   creating the first item of the same new type, can race.
//!
//! ## Example
//!
//! ```
//! use folio_engine::ContentManager;
//! use folio_core::VersionOptions;
//!
//! let manager = ContentManager::builder().build().unwrap();
//! let mut work = manager.begin();
//!
//! let page = work.new_item("page").unwrap();
//! work.create(&page, VersionOptions::Draft).unwrap();
//! let id = page.id().unwrap();
//!
//! assert!(work.get(id, VersionOptions::Published).unwrap().is_none());
//! work.publish(&page).unwrap();
//! assert!(work.get(id, VersionOptions::Published).unwrap().is_some());
//! ```

use std::sync::Arc;

use folio_core::{
    ContentDefinitionManager, ContentItemId, ContentItemRecord, ContentItemVersionRecord,
    ContentTypeDefinition, ContentTypeRecord, FolioError, FolioResult, Shared,
    VersionOptions,
};
use folio_storage::{ContentStore, InMemoryDefinitionStore};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::builtin::{CommonPartHandler, DefinitionPartsHandler, PartDataHandler};
use crate::config::FolioConfig;
use crate::context::{
    BuildDisplayContext, BuildEditorContext, CreateContentContext, GetContentItemMetadataContext,
    IndexContentContext, LoadContentContext, PublishContentContext, RemoveContentContext,
    UpdateEditorContext, VersionContentContext,
};
use crate::handler::{ContentHandler, Stage};
use crate::index::DocumentIndex;
use crate::item::ContentItem;
use crate::metadata::ContentItemMetadata;
use crate::pipeline::HandlerPipeline;
use crate::query::ContentQuery;
use crate::resolver::{all_versions, latest_version, max_version_number, resolve_version};
use crate::session::IdentitySession;
use crate::shape::{Shape, DISPLAY_SHAPE, EDITOR_SHAPE};

// =============================================================================
// ContentManager
// =============================================================================

/// Long-lived owner of storage, definitions, handlers and configuration
pub struct ContentManager {
    store: ContentStore,
    definitions: Arc<dyn ContentDefinitionManager>,
    pipeline: HandlerPipeline,
    config: FolioConfig,
    default_get: VersionOptions,
    default_create: VersionOptions,
}

impl ContentManager {
    /// Start configuring a manager
    pub fn builder() -> ContentManagerBuilder {
        ContentManagerBuilder::new()
    }

    /// Open a unit of work with a fresh identity session
    pub fn begin(&self) -> UnitOfWork<'_> {
        UnitOfWork {
            manager: self,
            session: IdentitySession::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    /// Backing repositories
    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Definition source
    pub fn definitions(&self) -> &dyn ContentDefinitionManager {
        self.definitions.as_ref()
    }

    /// Registered handlers in dispatch order
    pub fn handlers(&self) -> &HandlerPipeline {
        &self.pipeline
    }

    /// Every known content type definition
    pub fn get_content_type_definitions(&self) -> Vec<ContentTypeDefinition> {
        self.definitions.list_type_definitions()
    }

    /// Flush type, item and version repositories, in that order
    ///
    /// # Errors
    ///
    /// Returns the first repository error.
    pub fn flush(&self) -> FolioResult<()> {
        self.store.flush()
    }
}

impl std::fmt::Debug for ContentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentManager")
            .field("handlers", &self.pipeline)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for `ContentManager`
///
/// Defaults: in-memory store, empty definition store, no handlers, default
/// configuration. Handlers run in the order they are added.
///
/// ```
/// use folio_engine::{ContentManager, FolioConfig};
///
/// let manager = ContentManager::builder()
///     .with_builtin_handlers()
///     .config(FolioConfig::default())
///     .build()
///     .unwrap();
/// assert_eq!(manager.handlers().len(), 3);
/// ```
#[derive(Default)]
pub struct ContentManagerBuilder {
    store: Option<ContentStore>,
    definitions: Option<Arc<dyn ContentDefinitionManager>>,
    pipeline: HandlerPipeline,
    config: FolioConfig,
}

impl ContentManagerBuilder {
    /// Create a builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given repositories
    pub fn store(mut self, store: ContentStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Use the given definition source
    pub fn definitions(mut self, definitions: impl ContentDefinitionManager + 'static) -> Self {
        self.definitions = Some(Arc::new(definitions));
        self
    }

    /// Use a shared definition source
    pub fn definitions_arc(mut self, definitions: Arc<dyn ContentDefinitionManager>) -> Self {
        self.definitions = Some(definitions);
        self
    }

    /// Append a handler
    pub fn handler(self, handler: impl ContentHandler + 'static) -> Self {
        self.handler_arc(Arc::new(handler))
    }

    /// Append a shared handler
    pub fn handler_arc(mut self, handler: Arc<dyn ContentHandler>) -> Self {
        self.pipeline.register(handler);
        self
    }

    /// Append the definition parts, common part and part data handlers
    pub fn with_builtin_handlers(self) -> Self {
        self.handler(DefinitionPartsHandler)
            .handler(CommonPartHandler::new())
            .handler(PartDataHandler)
    }

    /// Use the given configuration
    pub fn config(mut self, config: FolioConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and build the manager
    ///
    /// # Errors
    ///
    /// Returns a config error if a setting is invalid.
    pub fn build(self) -> FolioResult<ContentManager> {
        self.config.validate()?;
        let default_get = self.config.default_get_options()?;
        let default_create = self.config.default_create_options()?;

        let manager = ContentManager {
            store: self.store.unwrap_or_else(ContentStore::in_memory),
            definitions: self
                .definitions
                .unwrap_or_else(|| Arc::new(InMemoryDefinitionStore::new())),
            pipeline: self.pipeline,
            config: self.config,
            default_get,
            default_create,
        };

        info!(
            handlers = manager.pipeline.len(),
            default_get = %manager.default_get,
            default_create = %manager.default_create,
            "Content manager ready"
        );
        Ok(manager)
    }
}

// =============================================================================
// UnitOfWork
// =============================================================================

/// One logical operation against a `ContentManager`
///
/// Owns the identity session: within a unit of work, resolving the same
/// version twice yields the same item instance.
pub struct UnitOfWork<'m> {
    manager: &'m ContentManager,
    session: IdentitySession,
}

impl<'m> UnitOfWork<'m> {
    /// Manager this unit of work runs against
    pub fn manager(&self) -> &'m ContentManager {
        self.manager
    }

    /// Identity session
    pub fn session(&self) -> &IdentitySession {
        &self.session
    }

    /// Forget every item loaded so far
    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Resolve one version of an item
    ///
    /// Returns `Ok(None)` when the item or the requested version does not
    /// exist. With `VersionRecord(id)` the version is resolved by its own id
    /// and `id` is not consulted. With `DraftRequired`, a published latest
    /// version is not returned; a new draft is forked from it instead.
    ///
    /// # Errors
    ///
    /// Returns repository and handler errors, and an invariant violation if
    /// a version record's item record is missing.
    pub fn get(
        &mut self,
        id: ContentItemId,
        options: VersionOptions,
    ) -> FolioResult<Option<ContentItem>> {
        let store = self.manager.store();

        let (record, version) = match options {
            VersionOptions::VersionRecord(version_id) => {
                if let Some(item) = self.session.recall(version_id) {
                    return Ok(Some(item));
                }
                let version = match store.versions.get(version_id)? {
                    Some(version) => version,
                    None => return Ok(None),
                };
                let item_id = version.read().content_item_id;
                let record = store.items.get(item_id)?.ok_or_else(|| {
                    FolioError::invariant(format!(
                        "version record {} belongs to missing content item {}",
                        version_id, item_id
                    ))
                })?;
                (record, version)
            }
            _ => {
                let record = match store.items.get(id)? {
                    Some(record) => record,
                    None => return Ok(None),
                };
                match resolve_version(&record, options, store.versions.as_ref())? {
                    Some(version) => (record, version),
                    None => return Ok(None),
                }
            }
        };

        let item = self.materialize(record, version)?;

        if options.is_draft_required() && item.is_published() {
            return self.build_new_version(&item).map(Some);
        }
        Ok(Some(item))
    }

    /// `get` with the configured default options
    ///
    /// # Errors
    ///
    /// Same as `get`.
    pub fn get_default(&mut self, id: ContentItemId) -> FolioResult<Option<ContentItem>> {
        let options = self.manager.default_get;
        self.get(id, options)
    }

    /// `get`, with absence reported as `NotFound`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing resolves, otherwise same as `get`.
    pub fn get_required(
        &mut self,
        id: ContentItemId,
        options: VersionOptions,
    ) -> FolioResult<ContentItem> {
        self.get(id, options)?.ok_or_else(|| {
            FolioError::not_found(format!("content item {} ({})", id, options))
        })
    }

    /// Every version of an item, ascending by number
    ///
    /// Each version goes through `get` by version record id, so it is
    /// loaded like any other and cached in the session.
    ///
    /// # Errors
    ///
    /// Returns repository and handler errors.
    pub fn get_all_versions(&mut self, id: ContentItemId) -> FolioResult<Vec<ContentItem>> {
        let store = self.manager.store();
        let record = match store.items.get(id)? {
            Some(record) => record,
            None => return Ok(Vec::new()),
        };

        let mut items = Vec::new();
        for version in all_versions(&record, store.versions.as_ref())? {
            let version_id = version.read().id;
            if let Some(item) = self.get(id, VersionOptions::VersionRecord(version_id))? {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// Start a query over stored items
    pub fn query(&mut self) -> ContentQuery<'_, 'm> {
        ContentQuery::new(self)
    }

    /// Build (or recall) the item for a resolved version
    fn materialize(
        &mut self,
        record: Shared<ContentItemRecord>,
        version: Shared<ContentItemVersionRecord>,
    ) -> FolioResult<ContentItem> {
        let version_id = version.read().id;
        if let Some(item) = self.session.recall(version_id) {
            return Ok(item);
        }

        let content_type = record.read().content_type.name.clone();
        let item = self.new_item(&content_type)?;
        item.attach(record.clone(), version.clone());
        // Stored before loading so re-entrant gets see this instance
        self.session.store(&item)?;

        let mut ctx = LoadContentContext {
            item: item.clone(),
            record,
            version,
        };
        self.invoke(Stage::Loading, |h, w| h.loading(&mut ctx, w))?;
        self.invoke(Stage::Loaded, |h, w| h.loaded(&mut ctx, w))?;
        Ok(item)
    }

    // =========================================================================
    // Creating
    // =========================================================================

    /// Persist a new item with its first version
    ///
    /// The version is number 1 and latest. It is published unless
    /// `options` is `Draft` (or `DraftRequired`); `Number(n)` sets the
    /// number. Creating and Created run after both records are persisted,
    /// then Publishing and Published if the version ended up published.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the item already has records,
    /// `InvalidInput` for `Number(0)`, and repository or handler errors.
    pub fn create(&mut self, item: &ContentItem, options: VersionOptions) -> FolioResult<()> {
        if item.version_record().is_some() {
            return Err(FolioError::invalid_operation(format!(
                "content item of type '{}' is already created",
                item.content_type()
            )));
        }
        let (number, published) = match options {
            VersionOptions::Number(0) => {
                return Err(FolioError::invalid_input("version numbers start at 1"))
            }
            VersionOptions::Number(n) => (n, true),
            VersionOptions::Draft | VersionOptions::DraftRequired => (1, false),
            _ => (1, true),
        };

        let content_type = self.acquire_content_type_record(item.content_type())?;
        let record = ContentItemRecord::new(content_type);
        let mut version = ContentItemVersionRecord::new(record.id, number);
        version.latest = true;
        version.published = published;

        let store = self.manager.store();
        let record = store.items.create(record)?;
        let version = store.versions.create(version)?;
        record.write().versions.push(version.clone());
        item.attach(record.clone(), version.clone());
        self.session.store(item)?;

        debug!(
            item = ?item.id(),
            content_type = item.content_type(),
            number,
            published,
            "Created content item"
        );

        let mut ctx = CreateContentContext {
            item: item.clone(),
            record,
            version: version.clone(),
        };
        self.invoke(Stage::Creating, |h, w| h.creating(&mut ctx, w))?;
        self.invoke(Stage::Created, |h, w| h.created(&mut ctx, w))?;

        let ended_published = version.read().published;
        if ended_published {
            let mut ctx = PublishContentContext {
                item: item.clone(),
                previous: None,
                publishing: Some(version),
            };
            self.invoke(Stage::Publishing, |h, w| h.publishing(&mut ctx, w))?;
            self.invoke(Stage::Published, |h, w| h.published(&mut ctx, w))?;
        }
        Ok(())
    }

    /// `create` with the configured default options
    ///
    /// # Errors
    ///
    /// Same as `create`.
    pub fn create_default(&mut self, item: &ContentItem) -> FolioResult<()> {
        let options = self.manager.default_create;
        self.create(item, options)
    }

    /// Build an item, let `initialize` fill it in, then create it
    ///
    /// # Errors
    ///
    /// Returns errors from building, from `initialize`, or from `create`.
    pub fn create_new<F>(
        &mut self,
        content_type: &str,
        options: VersionOptions,
        initialize: F,
    ) -> FolioResult<ContentItem>
    where
        F: FnOnce(&ContentItem) -> FolioResult<()>,
    {
        let item = self.new_item(content_type)?;
        initialize(&item)?;
        self.create(&item, options)?;
        Ok(item)
    }

    /// Find the type record for a name, creating it on first use
    ///
    /// Not guarded: two units of work creating the first item of the same
    /// new type can both create a record.
    fn acquire_content_type_record(&self, name: &str) -> FolioResult<ContentTypeRecord> {
        let types = &self.manager.store().types;
        if let Some(existing) = types.find(&|t: &ContentTypeRecord| t.name == name)? {
            let record = existing.read().clone();
            return Ok(record);
        }
        warn!(
            content_type = name,
            "Creating content type record without a uniqueness guard"
        );
        let created = types.create(ContentTypeRecord::new(name))?;
        let record = created.read().clone();
        Ok(record)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Make the item's version the published one
    ///
    /// No-op if it already is. The previously published version, if any,
    /// is unflagged after Publishing runs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for an item without records, and
    /// repository or handler errors.
    pub fn publish(&mut self, item: &ContentItem) -> FolioResult<()> {
        let (record, version) = item.require_records()?;
        let already_published = version.read().published;
        if already_published {
            return Ok(());
        }

        let previous = resolve_version(
            &record,
            VersionOptions::Published,
            self.manager.store().versions.as_ref(),
        )?;

        let mut ctx = PublishContentContext {
            item: item.clone(),
            previous: previous.clone(),
            publishing: Some(version.clone()),
        };
        self.invoke(Stage::Publishing, |h, w| h.publishing(&mut ctx, w))?;

        if let Some(previous) = &previous {
            previous.write().published = false;
        }
        version.write().published = true;
        debug!(item = ?item.id(), number = ?item.number(), "Published content item");

        self.invoke(Stage::Published, |h, w| h.published(&mut ctx, w))
    }

    /// Clear the published flag of the item's published version
    ///
    /// Targets the item's own version if it is published, otherwise the
    /// item's published version. No-op if nothing is published.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for an item without records, and
    /// repository or handler errors.
    pub fn unpublish(&mut self, item: &ContentItem) -> FolioResult<()> {
        let (record, version) = item.require_records()?;
        let own_published = version.read().published;

        let target = if own_published {
            Some(version)
        } else {
            let item_id = record.read().id;
            self.get(item_id, VersionOptions::Published)?
                .and_then(|published| published.version_record())
        };
        let target = match target {
            Some(target) => target,
            None => return Ok(()),
        };

        let mut ctx = PublishContentContext {
            item: item.clone(),
            previous: Some(target.clone()),
            publishing: None,
        };
        self.invoke(Stage::Publishing, |h, w| h.publishing(&mut ctx, w))?;

        let number = {
            let mut target = target.write();
            target.published = false;
            target.number
        };
        debug!(item = ?item.id(), number, "Unpublished content item");

        self.invoke(Stage::Published, |h, w| h.published(&mut ctx, w))
    }

    /// Soft-remove an item: clear latest and published on every version
    ///
    /// Nothing is deleted. Removing sees the versions still flagged.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for an item without records, and
    /// repository or handler errors.
    pub fn remove(&mut self, item: &ContentItem) -> FolioResult<()> {
        let (record, _) = item.require_records()?;
        let flagged: Vec<_> = all_versions(&record, self.manager.store().versions.as_ref())?
            .into_iter()
            .filter(|v| {
                let v = v.read();
                v.latest || v.published
            })
            .collect();

        let mut ctx = RemoveContentContext {
            item: item.clone(),
            versions: flagged.clone(),
        };
        self.invoke(Stage::Removing, |h, w| h.removing(&mut ctx, w))?;

        for version in &flagged {
            let mut version = version.write();
            version.latest = false;
            version.published = false;
        }
        debug!(item = ?item.id(), versions = flagged.len(), "Removed content item");

        self.invoke(Stage::Removed, |h, w| h.removed(&mut ctx, w))
    }

    /// Fork a new draft from an existing version
    ///
    /// The new version copies the existing data, is latest and unpublished,
    /// and is numbered one past the current latest (or past the highest
    /// number if nothing is latest). The previous latest is unflagged
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for an item without records or whose
    /// version numbers are exhausted, and repository or handler errors.
    pub fn build_new_version(&mut self, existing: &ContentItem) -> FolioResult<ContentItem> {
        let (record, existing_version) = existing.require_records()?;
        let store = self.manager.store();

        let latest = latest_version(&record, store.versions.as_ref())?;
        let current = match latest.as_ref().map(|v| v.read().number) {
            Some(latest_number) => latest_number,
            None => max_version_number(&record, store.versions.as_ref())?,
        };
        let number = current.checked_add(1).ok_or_else(|| {
            FolioError::invalid_operation(format!(
                "version number space exhausted after version {}",
                current
            ))
        })?;
        if let Some(latest) = &latest {
            latest.write().latest = false;
        }

        let (item_id, content_type) = {
            let record = record.read();
            (record.id, record.content_type.name.clone())
        };
        let data = existing_version.read().data.clone();
        let mut building = ContentItemVersionRecord::new(item_id, number);
        building.latest = true;
        building.data = data;

        let building_version = store.versions.create(building)?;
        record.write().versions.push(building_version.clone());

        let building_item = self.new_item(&content_type)?;
        building_item.attach(record.clone(), building_version.clone());
        self.session.store(&building_item)?;
        debug!(item = %item_id, number, "Built new version");

        let mut ctx = VersionContentContext {
            id: item_id,
            content_type,
            record,
            existing_item: existing.clone(),
            building_item: building_item.clone(),
            existing_version,
            building_version,
        };
        self.invoke(Stage::Versioning, |h, w| h.versioning(&mut ctx, w))?;
        self.invoke(Stage::Versioned, |h, w| h.versioned(&mut ctx, w))?;
        Ok(building_item)
    }

    // =========================================================================
    // Pass-throughs
    // =========================================================================

    /// Metadata for an item, refined by handlers
    ///
    /// # Errors
    ///
    /// Returns handler errors.
    pub fn get_item_metadata(&mut self, item: &ContentItem) -> FolioResult<ContentItemMetadata> {
        let mut ctx = GetContentItemMetadataContext {
            item: item.clone(),
            metadata: ContentItemMetadata::for_item(item),
        };
        self.invoke(Stage::GetContentItemMetadata, |h, w| {
            h.get_content_item_metadata(&mut ctx, w)
        })?;
        Ok(ctx.metadata)
    }

    /// Run Indexing and Indexed against a document
    ///
    /// # Errors
    ///
    /// Returns handler errors.
    pub fn index(&mut self, item: &ContentItem, document: &mut dyn DocumentIndex) -> FolioResult<()> {
        if let Some(id) = item.id() {
            document.set_content_item_id(id);
        }
        let mut ctx = IndexContentContext {
            item: item.clone(),
            document,
        };
        self.invoke(Stage::Indexing, |h, w| h.indexing(&mut ctx, w))?;
        self.invoke(Stage::Indexed, |h, w| h.indexed(&mut ctx, w))
    }

    /// Build a display shape
    ///
    /// # Errors
    ///
    /// Returns handler errors.
    pub fn build_display(&mut self, item: &ContentItem, display_type: &str) -> FolioResult<Shape> {
        let mut shape = Shape::new(DISPLAY_SHAPE);
        shape.display_type = Some(display_type.to_string());
        shape.content_item_id = item.id();

        let mut ctx = BuildDisplayContext {
            item: item.clone(),
            shape,
            display_type: display_type.to_string(),
        };
        self.invoke(Stage::BuildDisplayShape, |h, w| {
            h.build_display_shape(&mut ctx, w)
        })?;
        Ok(ctx.shape)
    }

    /// Build an editor shape
    ///
    /// # Errors
    ///
    /// Returns handler errors.
    pub fn build_editor(&mut self, item: &ContentItem) -> FolioResult<Shape> {
        let mut shape = Shape::new(EDITOR_SHAPE);
        shape.content_item_id = item.id();

        let mut ctx = BuildEditorContext {
            item: item.clone(),
            shape,
        };
        self.invoke(Stage::BuildEditorShape, |h, w| {
            h.build_editor_shape(&mut ctx, w)
        })?;
        Ok(ctx.shape)
    }

    /// Apply editor updates and return the editor shape
    ///
    /// # Errors
    ///
    /// Returns handler errors.
    pub fn update_editor(&mut self, item: &ContentItem, updates: Value) -> FolioResult<Shape> {
        let mut shape = Shape::new(EDITOR_SHAPE);
        shape.content_item_id = item.id();

        let mut ctx = UpdateEditorContext {
            item: item.clone(),
            shape,
            updates,
        };
        self.invoke(Stage::UpdateEditorShape, |h, w| {
            h.update_editor_shape(&mut ctx, w)
        })?;
        Ok(ctx.shape)
    }

    /// Flush the manager's repositories
    ///
    /// # Errors
    ///
    /// Returns the first repository error.
    pub fn flush(&self) -> FolioResult<()> {
        self.manager.flush()
    }
}

impl std::fmt::Debug for UnitOfWork<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("session", &self.session.len())
            .finish()
    }
}
