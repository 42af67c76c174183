//! Collaborator traits
//!
//! The engine never touches physical storage or schema sources directly.
//! It talks to these two seams:
//!
//! - `Repository<T>`: get/find/fetch/create/flush over one record kind
//! - `ContentDefinitionManager`: content type definition lookup
//!
//! Implementations decide durability, encoding and concurrency control.
//! The engine performs no locking around the records it receives; a
//! production repository should add its own serialization point.

use crate::definition::ContentTypeDefinition;
use crate::error::FolioResult;
use crate::records::{Record, Shared};

/// Predicate over a record, used by `find` and `fetch`
pub type Predicate<'a, T> = &'a dyn Fn(&T) -> bool;

/// Storage abstraction for one record kind
///
/// Records are returned as `Shared<T>` handles. Mutating a handle mutates
/// the stored record; `flush` is the point where an implementation makes
/// pending changes durable.
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
pub trait Repository<T: Record>: Send + Sync {
    /// Get a record by identity
    ///
    /// Returns None if no record has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn get(&self, id: T::Id) -> FolioResult<Option<Shared<T>>>;

    /// Get the first record matching the predicate
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn find(&self, predicate: Predicate<'_, T>) -> FolioResult<Option<Shared<T>>>;

    /// Get every record matching the predicate, in storage order
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn fetch(&self, predicate: Predicate<'_, T>) -> FolioResult<Vec<Shared<T>>>;

    /// Store a new record and return its shared handle
    ///
    /// # Errors
    ///
    /// Returns an error if a record with the same id already exists or the
    /// storage operation fails.
    fn create(&self, record: T) -> FolioResult<Shared<T>>;

    /// Make pending changes durable
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn flush(&self) -> FolioResult<()>;
}

/// Source of content type definitions
pub trait ContentDefinitionManager: Send + Sync {
    /// Look up a type definition by name
    fn get_type_definition(&self, name: &str) -> Option<ContentTypeDefinition>;

    /// List every known type definition
    fn list_type_definitions(&self) -> Vec<ContentTypeDefinition>;
}
