//! Capabilities the menu needs from the desktop host.
//!
//! The menu never owns any of these. Handlers receive a transient reference per
//! activation and drop it when they return.

use std::fmt;

use anyhow::Result;
use serde::Serialize;

pub mod headless;

/// Opaque handle naming a top-level host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// The host-managed top-level window.
///
/// Methods take `&self`: the value is a handle to host state, not the state itself.
pub trait Window {
    fn reload(&self);
    fn is_full_screen(&self) -> bool;
    fn set_full_screen(&self, full_screen: bool);
    fn toggle_dev_tools(&self);
    fn close(&self);
    fn maximize(&self);
    fn minimize(&self);
    /// Applies a text-editing command to the focused control.
    fn edit(&self, action: EditAction);
}

/// Editing commands forwarded to the focused control where the OS menu has no
/// built-in role handling (Win32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
}

impl EditAction {
    pub fn name(self) -> &'static str {
        match self {
            EditAction::Undo => "undo",
            EditAction::Redo => "redo",
            EditAction::Cut => "cut",
            EditAction::Copy => "copy",
            EditAction::Paste => "paste",
            EditAction::SelectAll => "select-all",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One-way events sent to the process that owns window lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    SoftRestartRequested,
    ShutdownRequested,
}

impl HostEvent {
    pub fn name(self) -> &'static str {
        match self {
            HostEvent::SoftRestartRequested => "soft-restart-requested",
            HostEvent::ShutdownRequested => "shutdown-requested",
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fire-and-forget channel to the privileged coordinating process.
pub trait SignalChannel {
    fn send(&self, event: HostEvent, payload: bool) -> Result<()>;
}

pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// An embedded content view (the connected blog's own web contents).
pub trait EmbeddedView {
    fn is_dev_tools_opened(&self) -> bool;
    fn open_dev_tools(&self);
    fn close_dev_tools(&self);
}

/// A UI region hosting an embedded content view for one connected instance.
pub trait InstanceHost {
    fn embedded_view(&self) -> Option<&dyn EmbeddedView>;
}

/// Selector-based lookup into the shell's UI. Returns at most one match.
pub trait ContentLookup {
    fn query(&self, selector: &str) -> Option<&dyn InstanceHost>;
}

pub trait WindowLookup {
    fn window(&self, id: WindowId) -> Option<&dyn Window>;
}

/// Borrowed bundle of host capabilities handed to the dispatcher.
#[derive(Clone, Copy)]
pub struct HostServices<'a> {
    pub signals: &'a dyn SignalChannel,
    pub opener: &'a dyn UrlOpener,
    pub content: &'a dyn ContentLookup,
    pub windows: &'a dyn WindowLookup,
}

/// Opens URLs with the operating system's default handler.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        shell_open(url)
    }
}

#[cfg(target_os = "windows")]
fn shell_open(url: &str) -> Result<()> {
    use anyhow::anyhow;
    use windows::{
        core::{w, PCWSTR},
        Win32::UI::{Shell::ShellExecuteW, WindowsAndMessaging::SW_SHOWNORMAL},
    };

    let wurl: Vec<u16> = url.encode_utf16().chain(std::iter::once(0)).collect();
    unsafe {
        let h = ShellExecuteW(
            None,
            w!("open"),
            PCWSTR::from_raw(wurl.as_ptr()),
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        );
        // Per Win32 docs: values <= 32 indicate an error.
        if (h.0 as isize) <= 32 {
            return Err(anyhow!("ShellExecuteW failed ({})", h.0 as isize));
        }
    }
    Ok(())
}

#[cfg(not(target_os = "windows"))]
fn shell_open(url: &str) -> Result<()> {
    use anyhow::{anyhow, Context};
    use std::process::Command;

    let program = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let status = Command::new(program)
        .arg(url)
        .status()
        .with_context(|| format!("running {program} {url}"))?;
    if !status.success() {
        return Err(anyhow!("{program} failed (exit={status})"));
    }
    Ok(())
}
