//! Timestamps on the `common` part
//!
//! Only items that have a `common` part welded (usually through their
//! definition) are touched. Timestamps are RFC 3339 strings in UTC.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use folio_core::FolioResult;
use serde_json::Value;

use crate::context::{CreateContentContext, PublishContentContext, VersionContentContext};
use crate::handler::ContentHandler;
use crate::item::ContentItem;
use crate::manager::UnitOfWork;

/// Part name maintained by `CommonPartHandler`
pub const COMMON_PART: &str = "common";

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Maintains `created_utc`, `modified_utc` and `published_utc`
///
/// - Creating: sets created and modified
/// - Versioned: sets modified on the new version
/// - Publishing: sets published, or clears it when unpublishing
#[derive(Clone)]
pub struct CommonPartHandler {
    clock: Clock,
}

impl CommonPartHandler {
    /// Handler using the system clock
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Handler using the given clock
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
        }
    }

    fn now(&self) -> Value {
        Value::String((self.clock)().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Set a field on the common part; items without one are left alone
    fn stamp(item: &ContentItem, field: &str, value: Value) -> bool {
        item.with_part_mut(COMMON_PART, |part| {
            part.set_field(field, value);
        })
        .is_some()
    }
}

impl Default for CommonPartHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommonPartHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommonPartHandler").finish_non_exhaustive()
    }
}

impl ContentHandler for CommonPartHandler {
    fn name(&self) -> &str {
        "common_part"
    }

    fn creating(&self, ctx: &mut CreateContentContext, _work: &mut UnitOfWork<'_>) -> FolioResult<()> {
        let now = self.now();
        if Self::stamp(&ctx.item, "created_utc", now.clone()) {
            Self::stamp(&ctx.item, "modified_utc", now);
        }
        Ok(())
    }

    fn versioned(
        &self,
        ctx: &mut VersionContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        Self::stamp(&ctx.building_item, "modified_utc", self.now());
        Ok(())
    }

    fn publishing(
        &self,
        ctx: &mut PublishContentContext,
        _work: &mut UnitOfWork<'_>,
    ) -> FolioResult<()> {
        let value = if ctx.is_unpublish() {
            Value::Null
        } else {
            self.now()
        };
        Self::stamp(&ctx.item, "published_utc", value);
        Ok(())
    }
}
