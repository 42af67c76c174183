//! Welds the parts named by a content type definition

use folio_core::FolioResult;
use serde_json::Value;

use crate::context::ActivatingContentContext;
use crate::handler::ContentHandler;
use crate::item::ContentPart;
use crate::manager::UnitOfWork;

/// Part setting prefix for default field values, e.g. `default.text`
const DEFAULT_PREFIX: &str = "default.";

/// Welds one part per part definition during Activating
///
/// Part settings named `default.<field>` seed that field with the setting's
/// string value.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefinitionPartsHandler;

impl ContentHandler for DefinitionPartsHandler {
    fn name(&self) -> &str {
        "definition_parts"
    }

    fn activating(
        &self,
        ctx: &mut ActivatingContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        for definition in &ctx.definition.parts {
            let mut part = ContentPart::new(definition.name.clone());
            for (key, value) in &definition.settings {
                if let Some(field) = key.strip_prefix(DEFAULT_PREFIX) {
                    part.set_field(field, Value::String(value.clone()));
                }
            }
            ctx.builder.weld(part);
        }
        Ok(())
    }
}
