use anyhow::{anyhow, Result};
use std::io::{Read, Seek};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::trace;

use crate::ui::actions::Action;
use crate::ui::viewport::Viewport;
use crate::ui::viewport_manager::{Frame, ViewportManager};

/// Where frames end up: a terminal, or a recorder in tests
pub trait FrameSink {
    /// Current size of the drawable area
    fn viewport(&mut self) -> Result<Viewport>;

    /// Display a freshly rendered frame
    fn present(&mut self, frame: &Frame) -> Result<()>;
}

/// Thread-safe handle to the pager state.
///
/// Every entry point holds the lock for the whole mutate, read, render and
/// present sequence, so a resize redraw and a keyboard command never see each
/// other's partial updates.
pub struct PagerSession<R> {
    manager: Arc<Mutex<ViewportManager<R>>>,
}

impl<R> Clone for PagerSession<R> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<R: Read + Seek> PagerSession<R> {
    pub fn new(manager: ViewportManager<R>) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
        }
    }

    /// Apply an action and redraw
    pub fn dispatch(&self, action: &Action, sink: &mut dyn FrameSink) -> Result<()> {
        let mut manager = self.lock()?;
        trace!(target: "input", "Dispatching {}", action);
        manager.set_viewport(sink.viewport()?);
        manager.apply(action)?;
        let frame = manager.refresh()?;
        sink.present(&frame)
    }

    /// Redraw with the sink's current size, e.g. after a resize
    pub fn rerender(&self, sink: &mut dyn FrameSink) -> Result<()> {
        let mut manager = self.lock()?;
        manager.set_viewport(sink.viewport()?);
        let frame = manager.refresh()?;
        sink.present(&frame)
    }

    /// Inspect the state under the same lock commands use
    pub fn with_manager<T>(&self, f: impl FnOnce(&ViewportManager<R>) -> T) -> Result<T> {
        let manager = self.lock()?;
        Ok(f(&manager))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ViewportManager<R>>> {
        self.manager
            .lock()
            .map_err(|_| anyhow!("Pager state lock poisoned"))
    }
}
