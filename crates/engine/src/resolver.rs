//! Version resolution
//!
//! Maps an item record and `VersionOptions` to the one version record that
//! satisfies the request.
//!
//! ## Two tiers
//!
//! The versions already materialized on the item record are checked first.
//! Only on a miss is the version repository asked, with the same predicate
//! scoped to the item. This avoids a store round-trip whenever the record's
//! versions are loaded.
//!
//! ## Priority
//!
//! `VersionOptions` is an enum, so exactly one branch applies; the order of
//! the checks in `VersionOptions::matches` mirrors the documented priority
//! (published, latest/draft-required, draft, number).

use std::collections::HashSet;

use folio_core::{
    ContentItemId, ContentItemRecord, ContentItemVersionRecord, FolioResult, Repository, Shared,
    VersionOptions, VersionRecordId,
};

/// Resolve the version of an item selected by `options`
///
/// Returns `Ok(None)` when nothing matches. `AllVersions` never selects a
/// single version. `VersionRecord(id)` is normally handled by the caller
/// before the item record is fetched; here it resolves by id and only
/// succeeds if the version belongs to this item.
///
/// # Errors
///
/// Returns an error if the version repository fails.
pub fn resolve_version(
    record: &Shared<ContentItemRecord>,
    options: VersionOptions,
    versions: &dyn Repository<ContentItemVersionRecord>,
) -> FolioResult<Option<Shared<ContentItemVersionRecord>>> {
    let (item_id, in_memory) = {
        let record = record.read();
        let in_memory = match options {
            VersionOptions::AllVersions => return Ok(None),
            VersionOptions::VersionRecord(_) => None,
            _ => record.find_version(|v| options.matches(v)),
        };
        (record.id, in_memory)
    };

    if let Some(version) = in_memory {
        return Ok(Some(version));
    }

    if let VersionOptions::VersionRecord(version_id) = options {
        let found = versions.get(version_id)?;
        let owned = found.filter(|v| v.read().content_item_id == item_id);
        return Ok(owned);
    }

    versions.find(&|v: &ContentItemVersionRecord| {
        v.content_item_id == item_id && options.matches(v)
    })
}

/// Current latest version of an item, if any
///
/// # Errors
///
/// Returns an error if the version repository fails.
pub fn latest_version(
    record: &Shared<ContentItemRecord>,
    versions: &dyn Repository<ContentItemVersionRecord>,
) -> FolioResult<Option<Shared<ContentItemVersionRecord>>> {
    resolve_version(record, VersionOptions::Latest, versions)
}

/// Highest version number of an item across both tiers (0 if none)
///
/// # Errors
///
/// Returns an error if the version repository fails.
pub fn max_version_number(
    record: &Shared<ContentItemRecord>,
    versions: &dyn Repository<ContentItemVersionRecord>,
) -> FolioResult<u32> {
    let (item_id, in_memory) = {
        let record = record.read();
        (record.id, record.max_number())
    };
    let stored = versions_of(item_id, versions)?
        .iter()
        .map(|v| v.read().number)
        .max()
        .unwrap_or(0);
    Ok(in_memory.max(stored))
}

/// Every stored version of an item, in repository order
///
/// # Errors
///
/// Returns an error if the version repository fails.
pub fn versions_of(
    item_id: ContentItemId,
    versions: &dyn Repository<ContentItemVersionRecord>,
) -> FolioResult<Vec<Shared<ContentItemVersionRecord>>> {
    versions.fetch(&|v: &ContentItemVersionRecord| v.content_item_id == item_id)
}

/// Every version of an item from both tiers, ascending by number
///
/// Versions on the record come first; repository versions are added only
/// if their id was not already seen.
///
/// # Errors
///
/// Returns an error if the version repository fails.
pub fn all_versions(
    record: &Shared<ContentItemRecord>,
    versions: &dyn Repository<ContentItemVersionRecord>,
) -> FolioResult<Vec<Shared<ContentItemVersionRecord>>> {
    let (item_id, mut all) = {
        let record = record.read();
        (record.id, record.versions.clone())
    };
    let mut seen: HashSet<VersionRecordId> = all.iter().map(|v| v.read().id).collect();
    for version in versions_of(item_id, versions)? {
        let id = version.read().id;
        if seen.insert(id) {
            all.push(version);
        }
    }
    all.sort_by_key(|v| v.read().number);
    Ok(all)
}
