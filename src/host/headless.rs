//! Host stand-ins for running menu actions outside the desktop shell (used by the CLI).
//! Window calls and signals are only logged.

use std::cell::Cell;

use anyhow::Result;
use tracing::info;

use super::{
    ContentLookup, EditAction, HostEvent, InstanceHost, SignalChannel, Window, WindowId,
    WindowLookup,
};

pub struct HeadlessWindow {
    id: WindowId,
    full_screen: Cell<bool>,
}

impl HeadlessWindow {
    pub fn new(id: WindowId) -> Self {
        Self {
            id,
            full_screen: Cell::new(false),
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }
}

impl Window for HeadlessWindow {
    fn reload(&self) {
        info!(window = %self.id, "reload");
    }

    fn is_full_screen(&self) -> bool {
        self.full_screen.get()
    }

    fn set_full_screen(&self, full_screen: bool) {
        info!(window = %self.id, full_screen, "set full screen");
        self.full_screen.set(full_screen);
    }

    fn toggle_dev_tools(&self) {
        info!(window = %self.id, "toggle devtools");
    }

    fn close(&self) {
        info!(window = %self.id, "close");
    }

    fn maximize(&self) {
        info!(window = %self.id, "maximize");
    }

    fn minimize(&self) {
        info!(window = %self.id, "minimize");
    }

    fn edit(&self, action: EditAction) {
        info!(window = %self.id, %action, "edit");
    }
}

impl WindowLookup for HeadlessWindow {
    fn window(&self, id: WindowId) -> Option<&dyn Window> {
        (id == self.id).then_some(self as &dyn Window)
    }
}

#[derive(Debug, Default)]
pub struct LoggingSignals;

impl SignalChannel for LoggingSignals {
    fn send(&self, event: HostEvent, payload: bool) -> Result<()> {
        info!(%event, payload, "signal");
        Ok(())
    }
}

/// A shell UI with no instance hosts.
#[derive(Debug, Default)]
pub struct NoContent;

impl ContentLookup for NoContent {
    fn query(&self, _selector: &str) -> Option<&dyn InstanceHost> {
        None
    }
}
