//! Content lifecycle engine for Folio
//!
//! This crate orchestrates the lower layers:
//! - ContentManager: owns store, definitions, handlers and config
//! - UnitOfWork: get/create/publish/unpublish/remove/build_new_version,
//!   queries, metadata, indexing and shapes, over one identity session
//! - Version resolution and the item factory
//! - Handler pipeline: ordered observers of every lifecycle stage
//! - Built-in handlers for definition parts, timestamps and part data
//!
//! The engine is the only component that knows about:
//! - Stage ordering around each transition
//! - Latest/published flag maintenance
//! - Item identity within a unit of work

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builtin;
pub mod config;
pub mod context;
mod factory;
pub mod handler;
pub mod index;
pub mod item;
pub mod manager;
pub mod metadata;
pub mod pipeline;
pub mod query;
pub mod resolver;
pub mod session;
pub mod shape;

pub use builtin::{CommonPartHandler, DefinitionPartsHandler, PartDataHandler, COMMON_PART};
pub use config::{FolioConfig, CONFIG_FILE_NAME};
pub use context::{
    ActivatedContentContext, ActivatingContentContext, BuildDisplayContext, BuildEditorContext,
    CreateContentContext, GetContentItemMetadataContext, IndexContentContext,
    InitializingContentContext, LoadContentContext, PublishContentContext, RemoveContentContext,
    UpdateEditorContext, VersionContentContext,
};
pub use handler::{ContentHandler, Stage};
pub use index::{DocumentIndex, IndexDocument};
pub use item::{ContentItem, ContentItemBuilder, ContentPart};
pub use manager::{ContentManager, ContentManagerBuilder, UnitOfWork};
pub use metadata::ContentItemMetadata;
pub use pipeline::HandlerPipeline;
pub use query::ContentQuery;
pub use session::IdentitySession;
pub use shape::{Shape, DISPLAY_SHAPE, EDITOR_SHAPE};
