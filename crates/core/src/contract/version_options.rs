//! Version selection for reads and creates
//!
//! `VersionOptions` is a request descriptor, never persisted. It tells the
//! resolver which version of an item a caller wants, and tells `create`
//! which state the first version should start in.
//!
//! ## Resolution priority
//!
//! When resolving against an item record the checks run in this order:
//!
//! 1. `VersionRecord(id)`: resolved by identity before the item is fetched
//! 2. `Published`: the published version
//! 3. `Latest` / `DraftRequired`: the latest version
//! 4. `Draft`: the latest version, only if it is not published
//! 5. `Number(n)`: the version with that number
//!
//! `AllVersions` selects nothing for single-item reads; it is only meaningful
//! to queries that enumerate versions.
//!
//! ## Text form
//!
//! Options parse from and render to `published`, `latest`, `draft`,
//! `draft-required`, `all`, `number:<n>` and `record:<uuid>`. This is the
//! form used in `folio.toml`.

use crate::error::FolioError;
use crate::records::ContentItemVersionRecord;
use crate::types::VersionRecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which version of a content item to read or create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VersionOptions {
    /// The published version
    #[default]
    Published,
    /// The latest version, published or not
    Latest,
    /// The latest version, only if it is not published
    Draft,
    /// The latest version; a new draft is forked if it is published
    DraftRequired,
    /// A specific version number
    Number(u32),
    /// A specific version record
    VersionRecord(VersionRecordId),
    /// Every version (queries only)
    AllVersions,
}

impl VersionOptions {
    /// Check if the published version is requested
    pub fn is_published(&self) -> bool {
        matches!(self, VersionOptions::Published)
    }

    /// Check if the latest version is requested
    ///
    /// True for both `Latest` and `DraftRequired`.
    pub fn is_latest(&self) -> bool {
        matches!(self, VersionOptions::Latest | VersionOptions::DraftRequired)
    }

    /// Check if an unpublished latest version is requested
    pub fn is_draft(&self) -> bool {
        matches!(self, VersionOptions::Draft)
    }

    /// Check if a draft must be produced even when the latest is published
    pub fn is_draft_required(&self) -> bool {
        matches!(self, VersionOptions::DraftRequired)
    }

    /// Explicit version number, if any
    pub fn version_number(&self) -> Option<u32> {
        match self {
            VersionOptions::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Explicit version record identity, if any
    pub fn version_record_id(&self) -> Option<VersionRecordId> {
        match self {
            VersionOptions::VersionRecord(id) => Some(*id),
            _ => None,
        }
    }

    /// Check whether a version satisfies these options
    ///
    /// This is the predicate both the in-memory and the repository tiers of
    /// resolution use. `AllVersions` matches everything.
    pub fn matches(&self, version: &ContentItemVersionRecord) -> bool {
        match self {
            VersionOptions::Published => version.published,
            VersionOptions::Latest | VersionOptions::DraftRequired => version.latest,
            VersionOptions::Draft => version.latest && !version.published,
            VersionOptions::Number(n) => version.number == *n,
            VersionOptions::VersionRecord(id) => version.id == *id,
            VersionOptions::AllVersions => true,
        }
    }
}

impl fmt::Display for VersionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionOptions::Published => write!(f, "published"),
            VersionOptions::Latest => write!(f, "latest"),
            VersionOptions::Draft => write!(f, "draft"),
            VersionOptions::DraftRequired => write!(f, "draft-required"),
            VersionOptions::Number(n) => write!(f, "number:{}", n),
            VersionOptions::VersionRecord(id) => write!(f, "record:{}", id),
            VersionOptions::AllVersions => write!(f, "all"),
        }
    }
}

impl FromStr for VersionOptions {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "published" => return Ok(VersionOptions::Published),
            "latest" => return Ok(VersionOptions::Latest),
            "draft" => return Ok(VersionOptions::Draft),
            "draft-required" => return Ok(VersionOptions::DraftRequired),
            "all" => return Ok(VersionOptions::AllVersions),
            _ => {}
        }

        if let Some(n) = s.strip_prefix("number:") {
            return match n.parse::<u32>() {
                Ok(n) if n > 0 => Ok(VersionOptions::Number(n)),
                _ => Err(FolioError::invalid_input(format!(
                    "Invalid version number '{}': expected a positive integer",
                    n
                ))),
            };
        }

        if let Some(id) = s.strip_prefix("record:") {
            return VersionRecordId::from_string(id)
                .map(VersionOptions::VersionRecord)
                .ok_or_else(|| {
                    FolioError::invalid_input(format!("Invalid version record id '{}'", id))
                });
        }

        Err(FolioError::invalid_input(format!(
            "Unknown version options '{}'",
            s
        )))
    }
}
