//! Item metadata
//!
//! Display text, identity and routes for an item. The manager fills in
//! defaults and handlers refine them in the GetContentItemMetadata stage.

use folio_core::ContentIdentity;
use serde::{Deserialize, Serialize};

use crate::item::ContentItem;

/// Describes how an item is shown and addressed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItemMetadata {
    /// Human-readable label
    pub display_text: Option<String>,
    /// Stable identity, independent of storage ids where handlers provide one
    pub identity: ContentIdentity,
    /// Route to the display view
    pub display_route: Option<String>,
    /// Route to the editor
    pub edit_route: Option<String>,
}

impl ContentItemMetadata {
    /// Defaults for an item: identity `id=<item id>` when the item has one
    pub fn for_item(item: &ContentItem) -> Self {
        let mut identity = ContentIdentity::new();
        if let Some(id) = item.id() {
            identity.add("id", id.to_string());
        }
        Self {
            identity,
            ..Self::default()
        }
    }
}
