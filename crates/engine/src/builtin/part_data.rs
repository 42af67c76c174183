//! Persists parts into version data
//!
//! Version data is a JSON object keyed by part name, each value being that
//! part's field map. Keys that are not parts of the item are left alone, so
//! other writers can share the object.

use folio_core::FolioResult;
use serde_json::{Map, Value};

use crate::context::{
    BuildDisplayContext, BuildEditorContext, CreateContentContext, IndexContentContext,
    LoadContentContext, PublishContentContext, UpdateEditorContext, VersionContentContext,
};
use crate::handler::ContentHandler;
use crate::item::{ContentItem, ContentPart};
use crate::manager::UnitOfWork;
use crate::shape::Shape;

/// Saves parts on Creating, Versioned and Publishing; restores them on
/// Loading and Versioning
///
/// Also renders parts into shapes, applies editor updates and indexes
/// fields as `<part>.<field>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PartDataHandler;

impl PartDataHandler {
    /// Write the item's parts into its version data
    ///
    /// Does nothing for an item without a version record.
    pub fn save(item: &ContentItem) {
        let version = match item.version_record() {
            Some(version) => version,
            None => return,
        };
        let parts = item.parts();

        let mut version = version.write();
        if !version.data.is_object() {
            version.data = Value::Object(Map::new());
        }
        if let Value::Object(data) = &mut version.data {
            for part in parts {
                data.insert(part.name, Value::Object(part.fields));
            }
        }
    }

    /// Restore the item's parts from its version data
    ///
    /// Welds parts found in the data that the item does not have yet.
    pub fn load(item: &ContentItem) {
        let data = match item.version_record() {
            Some(version) => version.read().data.clone(),
            None => return,
        };
        if let Value::Object(data) = data {
            for (name, value) in data {
                if let Value::Object(fields) = value {
                    item.weld(ContentPart { name, fields });
                }
            }
        }
    }
}

impl ContentHandler for PartDataHandler {
    fn name(&self) -> &str {
        "part_data"
    }

    fn creating(&self, ctx: &mut CreateContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        Self::save(&ctx.item);
        Ok(())
    }

    fn loading(&self, ctx: &mut LoadContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        Self::load(&ctx.item);
        Ok(())
    }

    fn versioning(
        &self,
        ctx: &mut VersionContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Self::load(&ctx.building_item);
        Ok(())
    }

    fn versioned(
        &self,
        ctx: &mut VersionContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Self::save(&ctx.building_item);
        Ok(())
    }

    fn publishing(
        &self,
        ctx: &mut PublishContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Self::save(&ctx.item);
        Ok(())
    }

    fn indexing(
        &self,
        ctx: &mut IndexContentContext<'_>,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        for part in ctx.item.parts() {
            for (field, value) in part.fields {
                ctx.document.add(&format!("{}.{}", part.name, field), value);
            }
        }
        Ok(())
    }

    fn build_display_shape(
        &self,
        ctx: &mut BuildDisplayContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        for part in ctx.item.parts() {
            ctx.shape.add_to_zone("content", part_shape("Parts", part));
        }
        Ok(())
    }

    fn build_editor_shape(
        &self,
        ctx: &mut BuildEditorContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        for part in ctx.item.parts() {
            ctx.shape.add_to_zone("content", part_shape("Parts_Edit", part));
        }
        Ok(())
    }

    fn update_editor_shape(
        &self,
        ctx: &mut UpdateEditorContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        if let Value::Object(updates) = &ctx.updates {
            for (part, fields) in updates {
                let fields = match fields {
                    Value::Object(fields) => fields,
                    _ => continue,
                };
                // Updates for parts the item does not have are ignored
                ctx.item.with_part_mut(part, |p| {
                    for (field, value) in fields {
                        p.set_field(field.clone(), value.clone());
                    }
                });
            }
        }
        for part in ctx.item.parts() {
            ctx.shape.add_to_zone("content", part_shape("Parts_Edit", part));
        }
        Ok(())
    }
}

fn part_shape(prefix: &str, part: ContentPart) -> Shape {
    let mut shape = Shape::new(format!("{}_{}", prefix, part.name));
    shape.properties = part.fields;
    shape
}
