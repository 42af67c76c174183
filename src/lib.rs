//! Folio - content versioning and lifecycle orchestration
//!
//! Every content item is a sequence of versions, at most one of which is
//! published and at most one latest. Folio resolves which version a request
//! wants, forks drafts, moves the published flag, and runs an ordered
//! pipeline of handlers around every transition.
//!
//! # Quick Start
//!
//! ```
//! use folio::{ContentManager, VersionOptions};
//!
//! let manager = ContentManager::builder()
//!     .with_builtin_handlers()
//!     .build()
//!     .unwrap();
//! let mut work = manager.begin();
//!
//! // Create a published page
//! let page = work.new_item("page").unwrap();
//! work.create(&page, VersionOptions::Published).unwrap();
//! let id = page.id().unwrap();
//!
//! // Ask for a draft: the published version is forked into version 2
//! let draft = work.get(id, VersionOptions::DraftRequired).unwrap().unwrap();
//! assert_eq!(draft.number(), Some(2));
//! assert!(!draft.is_published());
//! ```
//!
//! # Architecture
//!
//! - `folio-core`: ids, records, `VersionOptions`, definitions, errors and
//!   the repository and definition traits
//! - `folio-storage`: in-memory repositories and definition store
//! - `folio-engine`: `ContentManager`, `UnitOfWork`, handlers and queries
//!
//! Storage backends plug in by implementing `Repository` and passing a
//! `ContentStore` to the builder.

pub use folio_core::*;
pub use folio_engine::*;
pub use folio_storage::{ContentStore, InMemoryDefinitionStore, InMemoryRepository};
