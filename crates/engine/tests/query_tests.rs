//! Query, metadata, index, shape and storage integration tests

mod common;

use std::sync::Arc;

use common::*;
use folio_core::{
    ContentItemRecord, ContentItemVersionRecord, ContentTypeDefinitionBuilder, ContentTypeRecord,
    FolioResult, VersionOptions,
};
use folio_engine::*;
use folio_storage::{ContentStore, InMemoryDefinitionStore, InMemoryRepository};
use serde_json::json;
use tempfile::TempDir;

fn definitions() -> InMemoryDefinitionStore {
    InMemoryDefinitionStore::with_definitions([
        ContentTypeDefinitionBuilder::named("page")
            .display_name("Page")
            .with_part("title")
            .with_part_setting("title", "default.text", "Untitled")
            .with_part(COMMON_PART)
            .build(),
        ContentTypeDefinitionBuilder::named("article")
            .with_part("title")
            .build(),
    ])
}

fn builtin_manager(config: FolioConfig) -> ContentManager {
    ContentManager::builder()
        .definitions(definitions())
        .with_builtin_handlers()
        .config(config)
        .build()
        .unwrap()
}

fn create_titled(work: &mut UnitOfWork<'_>, content_type: &str, title: &str) -> ContentItem {
    let title = title.to_string();
    work.create_new(content_type, VersionOptions::Published, move |item| {
        item.set_field("title", "text", json!(title))
    })
    .unwrap()
}

fn titles(items: &[ContentItem]) -> Vec<String> {
    items
        .iter()
        .map(|i| i.field("title", "text").unwrap().as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Query
// ============================================================================

/// Queries filter by type and keep creation order
#[test]
fn test_query_for_type() {
    let manager = builtin_manager(FolioConfig::default());
    let mut work = manager.begin();
    create_titled(&mut work, "page", "one");
    create_titled(&mut work, "article", "two");
    create_titled(&mut work, "page", "three");

    let pages = work.query().for_type(["page"]).list().unwrap();
    assert_eq!(titles(&pages), vec!["one", "three"]);

    let both = work.query().for_type(["page", "article"]).list().unwrap();
    assert_eq!(titles(&both), vec!["one", "two", "three"]);

    assert_eq!(work.query().for_type(["missing"]).count().unwrap(), 0);
}

/// Query results go through the identity session
#[test]
fn test_query_results_share_session() {
    let manager = builtin_manager(FolioConfig::default());
    let mut work = manager.begin();
    let created = create_titled(&mut work, "page", "one");

    let listed = work.query().list().unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].same_instance(&created));
}

/// Version selection: published by default, latest, every version
#[test]
fn test_query_for_version() {
    let manager = builtin_manager(FolioConfig::default());
    let mut work = manager.begin();
    let first = create_titled(&mut work, "page", "one");
    let draft = work.build_new_version(&first).unwrap();
    draft.set_field("title", "text", json!("one v2")).unwrap();
    let second = work.new_item("page").unwrap();
    work.create(&second, VersionOptions::Draft).unwrap();

    assert_eq!(work.query().count().unwrap(), 1);

    let latest = work.query().for_version(VersionOptions::Latest).list().unwrap();
    assert_eq!(latest.len(), 2);
    assert!(latest[0].same_instance(&draft));
    assert!(latest[1].same_instance(&second));

    let all = work
        .query()
        .for_version(VersionOptions::AllVersions)
        .list()
        .unwrap();
    let numbers: Vec<_> = all.iter().map(|i| i.number().unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 1]);
}

/// DraftRequired in a query never forks
#[test]
fn test_query_draft_required_does_not_fork() {
    let manager = builtin_manager(FolioConfig::default());
    let mut work = manager.begin();
    let item = create_titled(&mut work, "page", "one");

    let listed = work
        .query()
        .for_version(VersionOptions::DraftRequired)
        .list()
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].same_instance(&item));
    assert_eq!(version_flags(&manager, &item), vec![(1, true, true)]);
}

/// Item predicates narrow results
#[test]
fn test_query_where_item() {
    let manager = builtin_manager(FolioConfig::default());
    let mut work = manager.begin();
    let keep = create_titled(&mut work, "page", "keep");
    create_titled(&mut work, "page", "drop");

    let keep_id = keep.id().unwrap();
    let listed = work
        .query()
        .where_item(move |r: &ContentItemRecord| r.id == keep_id)
        .list()
        .unwrap();
    assert_eq!(titles(&listed), vec!["keep"]);
}

/// Slicing and paging load only the requested window
#[test]
fn test_query_slice_and_page() {
    let config = FolioConfig {
        page_size: 2,
        ..FolioConfig::default()
    };
    let manager = builtin_manager(config);
    {
        let mut work = manager.begin();
        for title in ["a", "b", "c", "d", "e"] {
            create_titled(&mut work, "page", title);
        }
    }

    let mut work = manager.begin();
    assert_eq!(titles(&work.query().slice(1, 2).unwrap()), vec!["b", "c"]);
    assert_eq!(work.session().len(), 2);

    assert_eq!(titles(&work.query().page(0).unwrap()), vec!["a", "b"]);
    assert_eq!(titles(&work.query().page(2).unwrap()), vec!["e"]);
    assert!(work.query().page(3).unwrap().is_empty());
    assert_eq!(work.query().count().unwrap(), 5);
}

// ============================================================================
// Built-in handlers end to end
// ============================================================================

/// Fields set before create survive a reload in a new unit of work
#[test]
fn test_part_data_round_trip() {
    let manager = builtin_manager(FolioConfig::default());
    let id = {
        let mut work = manager.begin();
        create_titled(&mut work, "page", "Persisted").id().unwrap()
    };

    let mut work = manager.begin();
    let loaded = work.get(id, VersionOptions::Published).unwrap().unwrap();
    assert_eq!(loaded.field("title", "text"), Some(json!("Persisted")));
    assert!(loaded.field(COMMON_PART, "created_utc").is_some());
}

/// Definition defaults seed new items
#[test]
fn test_definition_defaults() {
    let manager = builtin_manager(FolioConfig::default());
    let mut work = manager.begin();
    let item = work.new_item("page").unwrap();
    assert_eq!(item.field("title", "text"), Some(json!("Untitled")));
    assert_eq!(
        manager
            .get_content_type_definitions()
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>(),
        vec!["article", "page"]
    );
}

// ============================================================================
// Metadata, index, shapes
// ============================================================================

struct TitleMetadata;

impl ContentHandler for TitleMetadata {
    fn get_content_item_metadata(
        &self,
        ctx: &mut GetContentItemMetadataContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        ctx.metadata.display_text = ctx
            .item
            .field("title", "text")
            .and_then(|v| v.as_str().map(str::to_string));
        if let Some(id) = ctx.item.id() {
            ctx.metadata.display_route = Some(format!("/content/{}", id));
        }
        Ok(())
    }
}

/// Metadata starts from the item id and is refined by handlers
#[test]
fn test_item_metadata() {
    let manager = ContentManager::builder()
        .definitions(definitions())
        .with_builtin_handlers()
        .handler(TitleMetadata)
        .build()
        .unwrap();
    let mut work = manager.begin();
    let item = create_titled(&mut work, "page", "Hello");
    let id = item.id().unwrap();

    let metadata = work.get_item_metadata(&item).unwrap();
    assert_eq!(metadata.display_text.as_deref(), Some("Hello"));
    assert_eq!(metadata.identity.get("id"), Some(id.to_string().as_str()));
    assert_eq!(metadata.display_route, Some(format!("/content/{}", id)));
    assert!(metadata.edit_route.is_none());
}

/// Indexing collects part fields and runs both stages
#[test]
fn test_index() {
    let log = new_log();
    let manager = ContentManager::builder()
        .definitions(definitions())
        .with_builtin_handlers()
        .handler(RecordingHandler::new("recorder", log.clone()))
        .build()
        .unwrap();
    let mut work = manager.begin();
    let item = create_titled(&mut work, "article", "Indexed");

    let mut document = IndexDocument::new();
    work.index(&item, &mut document).unwrap();

    assert_eq!(document.content_item_id, item.id());
    assert_eq!(document.get("title.text"), Some(&json!("Indexed")));
    assert_eq!(count(&log, Stage::Indexing), 1);
    assert_eq!(count(&log, Stage::Indexed), 1);
}

/// Display and editor shapes carry one child per part
#[test]
fn test_shapes() {
    let manager = builtin_manager(FolioConfig::default());
    let mut work = manager.begin();
    let item = create_titled(&mut work, "article", "Shaped");

    let display = work.build_display(&item, "Detail").unwrap();
    assert_eq!(display.shape_type, DISPLAY_SHAPE);
    assert_eq!(display.display_type.as_deref(), Some("Detail"));
    assert_eq!(display.content_item_id, item.id());
    assert_eq!(display.zone("content")[0].shape_type, "Parts_title");
    assert_eq!(
        display.zone("content")[0].property("text"),
        Some(&json!("Shaped"))
    );

    let editor = work.build_editor(&item).unwrap();
    assert_eq!(editor.shape_type, EDITOR_SHAPE);
    assert_eq!(editor.zone("content")[0].shape_type, "Parts_Edit_title");
}

/// Editor updates change welded parts and ignore unknown ones
#[test]
fn test_update_editor() {
    let manager = builtin_manager(FolioConfig::default());
    let mut work = manager.begin();
    let item = create_titled(&mut work, "article", "Before");

    let shape = work
        .update_editor(
            &item,
            json!({ "title": { "text": "After" }, "missing": { "x": 1 } }),
        )
        .unwrap();

    assert_eq!(item.field("title", "text"), Some(json!("After")));
    assert!(!item.has_part("missing"));
    assert_eq!(
        shape.zone("content")[0].property("text"),
        Some(&json!("After"))
    );
}

// ============================================================================
// Storage and configuration
// ============================================================================

/// Flush reaches every repository
#[test]
fn test_flush_reaches_repositories() {
    let types = Arc::new(InMemoryRepository::<ContentTypeRecord>::new());
    let items = Arc::new(InMemoryRepository::<ContentItemRecord>::new());
    let versions = Arc::new(InMemoryRepository::<ContentItemVersionRecord>::new());
    let store = ContentStore::new(types.clone(), items.clone(), versions.clone());
    let manager = ContentManager::builder().store(store).build().unwrap();

    let mut work = manager.begin();
    let item = work.new_item("page").unwrap();
    work.create(&item, VersionOptions::Published).unwrap();
    work.build_new_version(&item).unwrap();
    assert_eq!(versions.pending(), 2);

    work.flush().unwrap();
    assert_eq!(types.generation(), 1);
    assert_eq!(items.generation(), 1);
    assert_eq!(versions.generation(), 1);
    assert_eq!(versions.pending(), 0);
}

/// Defaults from folio.toml drive get_default and create_default
#[test]
fn test_config_file_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "default_get = \"latest\"\ndefault_create = \"draft\"\n").unwrap();
    let config = FolioConfig::from_file(&path).unwrap();

    let manager = ContentManager::builder().config(config).build().unwrap();
    let mut work = manager.begin();
    let item = work.new_item("page").unwrap();
    work.create_default(&item).unwrap();
    assert!(!item.is_published());

    let id = item.id().unwrap();
    let mut fresh = manager.begin();
    let latest = fresh.get_default(id).unwrap().unwrap();
    assert_eq!(latest.version_id(), item.version_id());
}
