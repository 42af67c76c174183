//! Content items and parts
//!
//! A `ContentItem` is the transient, handler-extended view of exactly one
//! version record. It is a cheap-to-clone handle: clones share state, so
//! an item recalled from the identity session is the same instance every
//! time within a unit of work.
//!
//! Handlers extend items with `ContentPart`s. Parts are welded onto a
//! `ContentItemBuilder` during the Activating stage, or onto the item itself
//! later.
//!
//! ## Lock order
//!
//! Accessors copy the record handles out of the item before touching the
//! records, so an item lock is never held while a record lock is taken.

use std::fmt;
use std::sync::Arc;

use folio_core::{
    ContentItemId, ContentItemRecord, ContentItemVersionRecord, ContentTypeDefinition,
    FolioError, FolioResult, Shared, VersionRecordId,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named group of fields attached to an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    /// Part name
    pub name: String,
    /// Field values
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl ContentPart {
    /// Create a part with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Map::new(),
        }
    }

    /// Get a field value
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field value, returning the previous one
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }
}

/// Collects parts for an item that does not exist yet
///
/// Handed to handlers in the Activating stage.
#[derive(Debug)]
pub struct ContentItemBuilder {
    definition: ContentTypeDefinition,
    parts: Vec<ContentPart>,
}

impl ContentItemBuilder {
    /// Start a builder for the given definition
    pub fn new(definition: ContentTypeDefinition) -> Self {
        Self {
            definition,
            parts: Vec::new(),
        }
    }

    /// Definition the item is built for
    pub fn definition(&self) -> &ContentTypeDefinition {
        &self.definition
    }

    /// Attach a part; a part with the same name is replaced
    pub fn weld(&mut self, part: ContentPart) -> &mut Self {
        match self.parts.iter_mut().find(|p| p.name == part.name) {
            Some(existing) => *existing = part,
            None => self.parts.push(part),
        }
        self
    }

    /// Check if a part is attached
    pub fn has_part(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Produce the item instance
    pub fn build(self) -> ContentItem {
        ContentItem {
            inner: Arc::new(ItemInner {
                definition: self.definition,
                state: RwLock::new(ItemState {
                    record: None,
                    version: None,
                    parts: self.parts,
                }),
            }),
        }
    }
}

struct ItemInner {
    definition: ContentTypeDefinition,
    state: RwLock<ItemState>,
}

struct ItemState {
    record: Option<Shared<ContentItemRecord>>,
    version: Option<Shared<ContentItemVersionRecord>>,
    parts: Vec<ContentPart>,
}

/// Handler-extended view of one version of a content item
///
/// Cloning yields another handle to the same instance.
#[derive(Clone)]
pub struct ContentItem {
    inner: Arc<ItemInner>,
}

impl ContentItem {
    // =========================================================================
    // Identity and records
    // =========================================================================

    /// Content type name
    pub fn content_type(&self) -> &str {
        &self.inner.definition.name
    }

    /// Definition the item was built from
    pub fn definition(&self) -> &ContentTypeDefinition {
        &self.inner.definition
    }

    /// Item record, once a version is attached
    pub fn record(&self) -> Option<Shared<ContentItemRecord>> {
        self.inner.state.read().record.clone()
    }

    /// Version record, once attached
    pub fn version_record(&self) -> Option<Shared<ContentItemVersionRecord>> {
        self.inner.state.read().version.clone()
    }

    /// Item id, once a version is attached
    pub fn id(&self) -> Option<ContentItemId> {
        let version = self.version_record()?;
        let id = version.read().content_item_id;
        Some(id)
    }

    /// Version record id, once attached
    pub fn version_id(&self) -> Option<VersionRecordId> {
        let version = self.version_record()?;
        let id = version.read().id;
        Some(id)
    }

    /// Version number, once attached
    pub fn number(&self) -> Option<u32> {
        let version = self.version_record()?;
        let number = version.read().number;
        Some(number)
    }

    /// Whether the attached version is published
    pub fn is_published(&self) -> bool {
        self.version_flag(|v| v.published)
    }

    /// Whether the attached version is the latest
    pub fn is_latest(&self) -> bool {
        self.version_flag(|v| v.latest)
    }

    fn version_flag(&self, flag: impl Fn(&ContentItemVersionRecord) -> bool) -> bool {
        match self.version_record() {
            Some(version) => {
                let version = version.read();
                flag(&*version)
            }
            None => false,
        }
    }

    /// Both records, or an error if the item was never created or loaded
    pub fn require_records(
        &self,
    ) -> FolioResult<(Shared<ContentItemRecord>, Shared<ContentItemVersionRecord>)> {
        let (record, version) = {
            let state = self.inner.state.read();
            (state.record.clone(), state.version.clone())
        };
        match (record, version) {
            (Some(record), Some(version)) => Ok((record, version)),
            _ => Err(FolioError::invalid_operation(format!(
                "content item of type '{}' has no version record; create it first",
                self.content_type()
            ))),
        }
    }

    /// Attach the records this item represents
    pub(crate) fn attach(
        &self,
        record: Shared<ContentItemRecord>,
        version: Shared<ContentItemVersionRecord>,
    ) {
        let mut state = self.inner.state.write();
        state.record = Some(record);
        state.version = Some(version);
    }

    /// Check if two handles refer to the same instance
    pub fn same_instance(&self, other: &ContentItem) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Parts
    // =========================================================================

    /// Check if a part is attached
    pub fn has_part(&self, name: &str) -> bool {
        self.inner.state.read().parts.iter().any(|p| p.name == name)
    }

    /// Copy of a part
    pub fn part(&self, name: &str) -> Option<ContentPart> {
        self.inner
            .state
            .read()
            .parts
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    /// Copy of every part, in weld order
    pub fn parts(&self) -> Vec<ContentPart> {
        self.inner.state.read().parts.clone()
    }

    /// Names of attached parts, in weld order
    pub fn part_names(&self) -> Vec<String> {
        self.inner
            .state
            .read()
            .parts
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    /// Attach a part after activation; a part with the same name is replaced
    pub fn weld(&self, part: ContentPart) {
        let mut state = self.inner.state.write();
        match state.parts.iter_mut().find(|p| p.name == part.name) {
            Some(existing) => *existing = part,
            None => state.parts.push(part),
        }
    }

    /// Run a closure against a part in place
    ///
    /// Returns None if the part is not attached. The closure must not call
    /// back into this item.
    pub fn with_part_mut<R>(&self, name: &str, f: impl FnOnce(&mut ContentPart) -> R) -> Option<R> {
        let mut state = self.inner.state.write();
        let result = state.parts.iter_mut().find(|p| p.name == name).map(f);
        result
    }

    /// Get a field value from a part
    pub fn field(&self, part: &str, field: &str) -> Option<Value> {
        self.inner
            .state
            .read()
            .parts
            .iter()
            .find(|p| p.name == part)
            .and_then(|p| p.field(field).cloned())
    }

    /// Set a field value on an attached part
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the part is not attached.
    pub fn set_field(&self, part: &str, field: &str, value: Value) -> FolioResult<()> {
        self.with_part_mut(part, |p| {
            p.set_field(field, value);
        })
        .ok_or_else(|| {
            FolioError::invalid_operation(format!(
                "part '{}' is not attached to this '{}' item",
                part,
                self.content_type()
            ))
        })
    }
}

impl fmt::Debug for ContentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentItem")
            .field("content_type", &self.content_type())
            .field("id", &self.id())
            .field("number", &self.number())
            .field("parts", &self.part_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{shared, ContentTypeRecord};
    use serde_json::json;

    fn built_item(parts: &[&str]) -> ContentItem {
        let mut builder = ContentItemBuilder::new(ContentTypeDefinition::empty("page"));
        for part in parts {
            builder.weld(ContentPart::new(*part));
        }
        builder.build()
    }

    #[test]
    fn test_builder_weld_replaces_same_name() {
        let mut builder = ContentItemBuilder::new(ContentTypeDefinition::empty("page"));
        let mut first = ContentPart::new("title");
        first.set_field("text", json!("a"));
        builder.weld(first);
        builder.weld(ContentPart::new("title"));
        let item = builder.build();
        assert_eq!(item.part_names(), vec!["title"]);
        assert!(item.field("title", "text").is_none());
    }

    #[test]
    fn test_shell_has_no_version() {
        let item = built_item(&[]);
        assert!(item.id().is_none());
        assert!(item.version_record().is_none());
        assert!(!item.is_published());
        assert!(item.require_records().is_err());
    }

    #[test]
    fn test_attach_exposes_records() {
        let item = built_item(&[]);
        let record = ContentItemRecord::new(ContentTypeRecord::new("page"));
        let mut version = ContentItemVersionRecord::new(record.id, 1);
        version.latest = true;
        let item_id = record.id;
        item.attach(shared(record), shared(version));

        assert_eq!(item.id(), Some(item_id));
        assert_eq!(item.number(), Some(1));
        assert!(item.is_latest());
        assert!(!item.is_published());
    }

    #[test]
    fn test_clones_share_fields() {
        let item = built_item(&["title"]);
        let other = item.clone();
        item.set_field("title", "text", json!("Hello")).unwrap();
        assert_eq!(other.field("title", "text"), Some(json!("Hello")));
        assert!(item.same_instance(&other));
    }

    #[test]
    fn test_set_field_on_missing_part_fails() {
        let item = built_item(&[]);
        assert!(item.set_field("title", "text", json!("x")).is_err());
    }

    #[test]
    fn test_weld_after_build() {
        let item = built_item(&[]);
        item.weld(ContentPart::new("body"));
        assert!(item.has_part("body"));
    }

    #[test]
    fn test_debug_does_not_deadlock() {
        let item = built_item(&["title"]);
        let rendered = format!("{:?}", item);
        assert!(rendered.contains("page"));
    }
}
