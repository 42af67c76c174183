//! Shapes
//!
//! A shape is the opaque display or editor model produced for an item.
//! The engine creates the root shape and runs the shape stages; what goes
//! into zones and properties is up to handlers and the renderer.

use std::collections::BTreeMap;

use folio_core::ContentItemId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root shape type for display models
pub const DISPLAY_SHAPE: &str = "Content";
/// Root shape type for editor models
pub const EDITOR_SHAPE: &str = "Content_Edit";

/// A display or editor model node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Shape type, e.g. "Content"
    pub shape_type: String,
    /// Display type for display shapes
    pub display_type: Option<String>,
    /// Item the shape renders
    pub content_item_id: Option<ContentItemId>,
    /// Named child shape lists
    #[serde(default)]
    pub zones: BTreeMap<String, Vec<Shape>>,
    /// Arbitrary properties
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Shape {
    /// Create an empty shape
    pub fn new(shape_type: impl Into<String>) -> Self {
        Self {
            shape_type: shape_type.into(),
            ..Self::default()
        }
    }

    /// Append a child shape to a zone
    pub fn add_to_zone(&mut self, zone: impl Into<String>, shape: Shape) {
        self.zones.entry(zone.into()).or_default().push(shape);
    }

    /// Child shapes of a zone
    pub fn zone(&self, zone: &str) -> &[Shape] {
        self.zones.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Set a property
    pub fn set_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    /// Get a property
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}
