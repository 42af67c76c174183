//! Item factory
//!
//! Builds an item instance for a content type name. Unknown names get an
//! empty definition instead of an error, so items of ad-hoc types can be
//! created without registering a schema first.

use folio_core::{ContentTypeDefinition, FolioResult};
use tracing::{debug, warn};

use crate::context::{
    ActivatedContentContext, ActivatingContentContext, InitializingContentContext,
};
use crate::handler::Stage;
use crate::item::{ContentItem, ContentItemBuilder};
use crate::manager::UnitOfWork;

impl<'m> UnitOfWork<'m> {
    /// Build a new item of the given type
    ///
    /// Runs Activating, Activated and Initializing, each to completion
    /// before the next. The result has no records attached; pass it to
    /// `create` to persist it.
    ///
    /// # Errors
    ///
    /// Returns the first handler error.
    pub fn new_item(&mut self, content_type: &str) -> FolioResult<ContentItem> {
        let definition = match self.manager().definitions().get_type_definition(content_type) {
            Some(definition) => definition,
            None => {
                warn!(content_type, "No definition for content type; using an empty one");
                ContentTypeDefinition::empty(content_type)
            }
        };

        let mut activating = ActivatingContentContext {
            content_type: content_type.to_string(),
            definition: definition.clone(),
            builder: ContentItemBuilder::new(definition),
        };
        self.invoke(Stage::Activating, |h, w| h.activating(&mut activating, w))?;

        let item = activating.builder.build();

        let mut activated = ActivatedContentContext {
            content_type: content_type.to_string(),
            item: item.clone(),
        };
        self.invoke(Stage::Activated, |h, w| h.activated(&mut activated, w))?;

        let mut initializing = InitializingContentContext {
            content_type: content_type.to_string(),
            item: item.clone(),
        };
        self.invoke(Stage::Initializing, |h, w| {
            h.initializing(&mut initializing, w)
        })?;

        debug!(content_type, parts = ?item.part_names(), "Built content item");
        Ok(item)
    }
}
