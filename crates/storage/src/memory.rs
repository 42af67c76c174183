//! InMemoryRepository: reference `Repository` backend
//!
//! This module implements the Repository trait using:
//! - an insertion-ordered `Vec` of shared record handles
//! - a `HashMap` from record id to position for O(1) `get`
//! - `parking_lot::RwLock` for thread-safe access
//! - `AtomicU64` counters for pending creates and flush generations
//!
//! # Design Notes
//!
//! - **Insertion order**: `fetch` returns records in creation order, which
//!   gives queries a stable order without a sort key
//! - **Handles, not copies**: callers mutate records through the returned
//!   `Shared<T>`; there is nothing to write back
//! - **Flush is bookkeeping**: there is no durable medium, so `flush` only
//!   resets the pending counter and advances the generation
//!
//! # Lock order
//!
//! `find` and `fetch` read-lock each record while holding the repository
//! lock. Callers must not hold a record's write lock across those calls.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use folio_core::{shared, FolioError, FolioResult, Predicate, Record, Repository, Shared};
use parking_lot::RwLock;
use tracing::{debug, trace};

struct Inner<T: Record> {
    records: Vec<Shared<T>>,
    positions: HashMap<T::Id, usize>,
}

/// In-memory repository for one record kind
///
/// Thread-safe through `parking_lot::RwLock` and `AtomicU64`.
pub struct InMemoryRepository<T: Record> {
    inner: RwLock<Inner<T>>,
    /// Records created since the last flush
    pending: AtomicU64,
    /// Number of completed flushes
    generation: AtomicU64,
}

impl<T: Record> InMemoryRepository<T> {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                positions: HashMap::new(),
            }),
            pending: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Check if no records are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records created since the last flush
    pub fn pending(&self) -> u64 {
        self.pending.load(Ordering::SeqCst)
    }

    /// Number of completed flushes
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored record handle, in creation order
    pub fn all(&self) -> Vec<Shared<T>> {
        self.inner.read().records.clone()
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> fmt::Debug for InMemoryRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRepository")
            .field("kind", &T::KIND)
            .field("len", &self.len())
            .field("pending", &self.pending())
            .field("generation", &self.generation())
            .finish()
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn get(&self, id: T::Id) -> FolioResult<Option<Shared<T>>> {
        let inner = self.inner.read();
        Ok(inner
            .positions
            .get(&id)
            .map(|&pos| inner.records[pos].clone()))
    }

    fn find(&self, predicate: Predicate<'_, T>) -> FolioResult<Option<Shared<T>>> {
        let inner = self.inner.read();
        Ok(inner
            .records
            .iter()
            .find(|r| predicate(&*r.read()))
            .cloned())
    }

    fn fetch(&self, predicate: Predicate<'_, T>) -> FolioResult<Vec<Shared<T>>> {
        let inner = self.inner.read();
        Ok(inner
            .records
            .iter()
            .filter(|r| predicate(&*r.read()))
            .cloned()
            .collect())
    }

    fn create(&self, record: T) -> FolioResult<Shared<T>> {
        let id = record.id();
        let mut inner = self.inner.write();
        if inner.positions.contains_key(&id) {
            return Err(FolioError::storage(format!(
                "{} '{}' already exists",
                T::KIND,
                id
            )));
        }

        let handle = shared(record);
        let pos = inner.records.len();
        inner.records.push(handle.clone());
        inner.positions.insert(id, pos);
        self.pending.fetch_add(1, Ordering::SeqCst);

        trace!(kind = T::KIND, id = %id, "Created record");
        Ok(handle)
    }

    fn flush(&self) -> FolioResult<()> {
        let pending = self.pending.swap(0, Ordering::SeqCst);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(kind = T::KIND, pending, generation, "Flushed repository");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ContentItemId, ContentItemVersionRecord, ContentTypeRecord};

    #[test]
    fn test_create_and_get() {
        let repo = InMemoryRepository::new();
        let handle = repo.create(ContentTypeRecord::new("page")).unwrap();
        let id = handle.read().id;

        let fetched = repo.get(id).unwrap().unwrap();
        assert!(std::sync::Arc::ptr_eq(&handle, &fetched));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let repo: InMemoryRepository<ContentTypeRecord> = InMemoryRepository::new();
        assert!(repo.get(folio_core::ContentTypeId::new()).unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let repo = InMemoryRepository::new();
        let record = ContentTypeRecord::new("page");
        repo.create(record.clone()).unwrap();
        let err = repo.create(record).unwrap_err();
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_fetch_preserves_creation_order() {
        let repo = InMemoryRepository::new();
        let item = ContentItemId::new();
        for n in [3, 1, 2] {
            repo.create(ContentItemVersionRecord::new(item, n)).unwrap();
        }
        let numbers: Vec<u32> = repo
            .fetch(&|_: &ContentItemVersionRecord| true)
            .unwrap()
            .iter()
            .map(|v| v.read().number)
            .collect();
        assert_eq!(numbers, vec![3, 1, 2]);
    }

    #[test]
    fn test_find_sees_in_place_mutation() {
        let repo = InMemoryRepository::new();
        let handle = repo
            .create(ContentItemVersionRecord::new(ContentItemId::new(), 1))
            .unwrap();
        assert!(repo
            .find(&|v: &ContentItemVersionRecord| v.published)
            .unwrap()
            .is_none());

        handle.write().published = true;
        assert!(repo
            .find(&|v: &ContentItemVersionRecord| v.published)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_flush_resets_pending() {
        let repo = InMemoryRepository::new();
        repo.create(ContentTypeRecord::new("a")).unwrap();
        repo.create(ContentTypeRecord::new("b")).unwrap();
        assert_eq!(repo.pending(), 2);

        repo.flush().unwrap();
        assert_eq!(repo.pending(), 0);
        assert_eq!(repo.generation(), 1);
    }

    #[test]
    fn test_payload_is_stored_verbatim() {
        let repo = InMemoryRepository::new();
        let mut version = ContentItemVersionRecord::new(ContentItemId::new(), 1);
        version.data = serde_json::json!({"title": {"text": "Hello"}});
        let handle = repo.create(version).unwrap();
        assert_eq!(handle.read().data["title"]["text"], "Hello");
    }
}
