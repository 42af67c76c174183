//! Contract types shared by callers and handlers
//!
//! ## Module Structure
//!
//! - `version_options`: which version a read or create targets
//! - `identity`: portable name/value identity of an item
//!
//! ## Usage
//!
//! ```
//! use folio_core::contract::{ContentIdentity, VersionOptions};
//!
//! let options: VersionOptions = "draft-required".parse().unwrap();
//! assert!(options.is_draft_required());
//! assert!(ContentIdentity::new().is_empty());
//! ```

pub mod identity;
pub mod version_options;

// Re-exports
pub use identity::ContentIdentity;
pub use version_options::VersionOptions;
