//! Content type definitions
//!
//! A definition describes the shape of a content type: which parts an item
//! of that type carries and free-form settings for the type and each part.
//! Definitions are owned by a `ContentDefinitionManager`; the engine only
//! reads them.
//!
//! An unknown type name is never an error. The engine synthesizes
//! `ContentTypeDefinition::empty(name)` so the item can still be built,
//! just without parts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings map attached to types and parts
pub type Settings = BTreeMap<String, String>;

/// A part attached to a content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypePartDefinition {
    /// Part name
    pub name: String,
    /// Part settings for this type
    #[serde(default)]
    pub settings: Settings,
}

impl ContentTypePartDefinition {
    /// Create a part definition without settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: Settings::new(),
        }
    }

    /// Get a setting value
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }
}

/// Shape of a content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeDefinition {
    /// Type name
    pub name: String,
    /// Display name (defaults to the type name)
    pub display_name: String,
    /// Attached parts, in definition order
    #[serde(default)]
    pub parts: Vec<ContentTypePartDefinition>,
    /// Type settings
    #[serde(default)]
    pub settings: Settings,
}

impl ContentTypeDefinition {
    /// Definition with no parts or settings
    pub fn empty(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            parts: Vec::new(),
            settings: Settings::new(),
        }
    }

    /// Find an attached part by name
    pub fn part(&self, name: &str) -> Option<&ContentTypePartDefinition> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Get a type setting value
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }
}

/// Fluent builder for `ContentTypeDefinition`
///
/// ```
/// use folio_core::definition::ContentTypeDefinitionBuilder;
///
/// let page = ContentTypeDefinitionBuilder::named("page")
///     .display_name("Page")
///     .with_part("title")
///     .with_part_setting("body", "default.format", "markdown")
///     .build();
///
/// assert_eq!(page.parts.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ContentTypeDefinitionBuilder {
    definition: ContentTypeDefinition,
}

impl ContentTypeDefinitionBuilder {
    /// Start a definition for the given type name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            definition: ContentTypeDefinition::empty(name),
        }
    }

    /// Start from an existing definition
    pub fn from_definition(definition: ContentTypeDefinition) -> Self {
        Self { definition }
    }

    /// Set the display name
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.definition.display_name = display_name.into();
        self
    }

    /// Attach a part (no-op if already attached)
    pub fn with_part(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if self.definition.part(&name).is_none() {
            self.definition.parts.push(ContentTypePartDefinition::new(name));
        }
        self
    }

    /// Set a part setting, attaching the part if needed
    pub fn with_part_setting(
        mut self,
        part: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let part = part.into();
        self = self.with_part(part.clone());
        if let Some(p) = self.definition.parts.iter_mut().find(|p| p.name == part) {
            p.settings.insert(key.into(), value.into());
        }
        self
    }

    /// Set a type setting
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.definition.settings.insert(key.into(), value.into());
        self
    }

    /// Detach a part
    pub fn remove_part(mut self, name: &str) -> Self {
        self.definition.parts.retain(|p| p.name != name);
        self
    }

    /// Finish the definition
    pub fn build(self) -> ContentTypeDefinition {
        self.definition
    }
}
