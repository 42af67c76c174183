//! Built-in handlers
//!
//! Opt-in handlers covering the usual plumbing. Register them in this order
//! (`ContentManagerBuilder::with_builtin_handlers` does):
//!
//! 1. `DefinitionPartsHandler` welds the parts a definition names
//! 2. `CommonPartHandler` keeps timestamps on the `common` part
//! 3. `PartDataHandler` persists parts into version data
//!
//! `PartDataHandler` goes last so that it saves what earlier handlers wrote
//! in the same stage.

mod common;
mod definition_parts;
mod part_data;

pub use common::{CommonPartHandler, COMMON_PART};
pub use definition_parts::DefinitionPartsHandler;
pub use part_data::PartDataHandler;
