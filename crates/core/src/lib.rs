//! Core types and traits for Folio
//!
//! This crate defines the foundational types used throughout the system:
//! - Identifiers: ContentTypeId, ContentItemId, VersionRecordId
//! - Records: ContentTypeRecord, ContentItemRecord, ContentItemVersionRecord
//! - Contract types: VersionOptions, ContentIdentity
//! - Definitions: ContentTypeDefinition and its builder
//! - Error: FolioError and FolioResult
//! - Traits: collaborator seams (Repository, ContentDefinitionManager)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod definition;
pub mod error;
pub mod records;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use contract::{ContentIdentity, VersionOptions};
pub use definition::{
    ContentTypeDefinition, ContentTypeDefinitionBuilder, ContentTypePartDefinition, Settings,
};
pub use error::{FolioError, FolioResult};
pub use records::{
    shared, ContentItemRecord, ContentItemVersionRecord, ContentTypeRecord, Record, Shared,
};
pub use traits::{ContentDefinitionManager, Predicate, Repository};
pub use types::{ContentItemId, ContentTypeId, VersionRecordId};
