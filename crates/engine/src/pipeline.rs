//! Handler pipeline
//!
//! The ordered list of registered handlers and the dispatch loop that runs
//! one stage across all of them.
//!
//! ## Design
//!
//! - Order is registration order. It never changes after the manager is
//!   built.
//! - A stage sweep calls every handler in turn, synchronously, with the same
//!   mutable context.
//! - The first error stops the sweep and is returned unchanged. Handlers
//!   earlier in the sweep keep whatever side effects they applied.

use std::sync::Arc;

use folio_core::FolioResult;
use tracing::{info, trace};

use crate::handler::{ContentHandler, Stage};
use crate::manager::UnitOfWork;

/// Ordered handler list
#[derive(Default, Clone)]
pub struct HandlerPipeline {
    handlers: Vec<Arc<dyn ContentHandler>>,
}

impl HandlerPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler; it runs after every handler registered before it
    pub fn register(&mut self, handler: Arc<dyn ContentHandler>) {
        info!(
            handler = handler.name(),
            position = self.handlers.len(),
            "Registered content handler"
        );
        self.handlers.push(handler);
    }

    /// Number of handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handlers are registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handlers in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ContentHandler>> {
        self.handlers.iter()
    }

    /// Handler names in dispatch order
    pub fn names(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.name().to_string()).collect()
    }
}

impl std::fmt::Debug for HandlerPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerPipeline")
            .field("handlers", &self.names())
            .finish()
    }
}

impl<'m> UnitOfWork<'m> {
    /// Run one stage across every handler in registration order
    ///
    /// `f` calls the stage method on the handler it is given. The first
    /// error is returned as-is and later handlers are not called.
    pub(crate) fn invoke<F>(&mut self, stage: Stage, mut f: F) -> FolioResult<()>
    where
        F: FnMut(&dyn ContentHandler, &mut UnitOfWork<'m>) -> FolioResult<()>,
    {
        let manager = self.manager();
        for handler in manager.handlers().iter() {
            trace!(stage = %stage, handler = handler.name(), "Dispatching");
            f(handler.as_ref(), &mut *self)?;
        }
        Ok(())
    }
}
