//! Content queries
//!
//! Selects item records by type and predicate, picks versions of each with
//! `VersionOptions`, and materializes the result through `UnitOfWork::get`
//! by version record id. Results share the unit of work's identity session
//! and go through Loading/Loaded like any other get.
//!
//! Order is item creation order, then version number.

use folio_core::{
    ContentItemRecord, ContentItemVersionRecord, FolioResult, Repository, Shared, VersionOptions,
};

use crate::item::ContentItem;
use crate::manager::UnitOfWork;
use crate::resolver::{all_versions, resolve_version};

type ItemFilter<'w> = Box<dyn Fn(&ContentItemRecord) -> bool + 'w>;

/// Query builder bound to a unit of work
///
/// ```
/// use folio_engine::ContentManager;
/// use folio_core::VersionOptions;
///
/// let manager = ContentManager::builder().build().unwrap();
/// let mut work = manager.begin();
/// for _ in 0..3 {
///     let item = work.new_item("page").unwrap();
///     work.create(&item, VersionOptions::Published).unwrap();
/// }
///
/// assert_eq!(work.query().for_type(["page"]).count().unwrap(), 3);
/// assert_eq!(work.query().slice(1, 5).unwrap().len(), 2);
/// ```
pub struct ContentQuery<'w, 'm> {
    work: &'w mut UnitOfWork<'m>,
    types: Option<Vec<String>>,
    options: VersionOptions,
    filter: Option<ItemFilter<'w>>,
}

impl<'w, 'm> ContentQuery<'w, 'm> {
    pub(crate) fn new(work: &'w mut UnitOfWork<'m>) -> Self {
        Self {
            work,
            types: None,
            options: VersionOptions::Published,
            filter: None,
        }
    }

    /// Restrict to the given content type names
    pub fn for_type<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Choose which versions are returned (default `Published`)
    ///
    /// `AllVersions` returns every version of every matching item.
    /// `DraftRequired` selects the latest version and never forks a draft.
    pub fn for_version(mut self, options: VersionOptions) -> Self {
        self.options = options;
        self
    }

    /// Keep only item records matching a predicate
    pub fn where_item(mut self, predicate: impl Fn(&ContentItemRecord) -> bool + 'w) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Number of matching versions, without loading items
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub fn count(self) -> FolioResult<usize> {
        Ok(self.matching_versions()?.len())
    }

    /// Every matching item
    ///
    /// # Errors
    ///
    /// Returns repository and handler errors.
    pub fn list(self) -> FolioResult<Vec<ContentItem>> {
        let versions = self.matching_versions()?;
        materialize(self.work, versions)
    }

    /// Matching items after skipping `skip`, at most `take` of them
    ///
    /// Only the returned items are loaded.
    ///
    /// # Errors
    ///
    /// Returns repository and handler errors.
    pub fn slice(self, skip: usize, take: usize) -> FolioResult<Vec<ContentItem>> {
        let versions: Vec<_> = self
            .matching_versions()?
            .into_iter()
            .skip(skip)
            .take(take)
            .collect();
        materialize(self.work, versions)
    }

    /// Zero-based page of matching items, sized by `page_size` in config
    ///
    /// # Errors
    ///
    /// Returns repository and handler errors.
    pub fn page(self, page: usize) -> FolioResult<Vec<ContentItem>> {
        let size = self.work.manager().config().page_size;
        self.slice(page.saturating_mul(size), size)
    }

    fn matching_versions(&self) -> FolioResult<Vec<Shared<ContentItemVersionRecord>>> {
        let store = self.work.manager().store();
        let versions: &dyn Repository<ContentItemVersionRecord> = store.versions.as_ref();

        let types = self.types.as_deref();
        let filter = self.filter.as_deref();
        let records = store.items.fetch(&|r: &ContentItemRecord| {
            let type_matches = types.map_or(true, |names| {
                names.iter().any(|name| *name == r.content_type.name)
            });
            type_matches && filter.map_or(true, |f| f(r))
        })?;

        let mut selected = Vec::new();
        for record in &records {
            match self.options {
                VersionOptions::AllVersions => selected.extend(all_versions(record, versions)?),
                VersionOptions::DraftRequired => {
                    selected.extend(resolve_version(record, VersionOptions::Latest, versions)?)
                }
                other => selected.extend(resolve_version(record, other, versions)?),
            }
        }
        Ok(selected)
    }
}

fn materialize(
    work: &mut UnitOfWork<'_>,
    versions: Vec<Shared<ContentItemVersionRecord>>,
) -> FolioResult<Vec<ContentItem>> {
    let mut items = Vec::with_capacity(versions.len());
    for version in versions {
        let (item_id, version_id) = {
            let version = version.read();
            (version.content_item_id, version.id)
        };
        if let Some(item) = work.get(item_id, VersionOptions::VersionRecord(version_id))? {
            items.push(item);
        }
    }
    Ok(items)
}

impl std::fmt::Debug for ContentQuery<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentQuery")
            .field("types", &self.types)
            .field("options", &self.options)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}
