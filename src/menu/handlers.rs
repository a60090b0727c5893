//! Menu item handlers. Each performs a single host call and treats a missing
//! window or UI element as a no-op.

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::RunMode;
use crate::host::{ContentLookup, HostEvent, SignalChannel, UrlOpener, Window};
use crate::platform::Platform;

pub const REPOSITORY_URL: &str = "http://github.com/tryghost/ghost-desktop";
pub const ISSUES_URL: &str = "http://github.com/tryghost/ghost-desktop/issues";

/// UI selector for the instance host currently shown to the user.
pub const SELECTED_INSTANCE_HOST: &str = "div.instance-host.selected";

/// Reloads the focused window directly, except on macOS outside test mode where the
/// lifecycle process performs a soft restart instead. With no focused window the
/// soft restart is requested on every platform.
pub fn reload(
    focused: Option<&dyn Window>,
    platform: &Platform,
    mode: RunMode,
    signals: &dyn SignalChannel,
) -> Result<()> {
    match focused {
        Some(window) if !platform.is_mac() || mode == RunMode::Test => {
            window.reload();
            Ok(())
        }
        _ => signals
            .send(HostEvent::SoftRestartRequested, true)
            .context("request soft restart"),
    }
}

pub fn toggle_fullscreen(focused: Option<&dyn Window>) {
    if let Some(window) = focused {
        window.set_full_screen(!window.is_full_screen());
    }
}

pub fn toggle_dev_tools(focused: Option<&dyn Window>) {
    if let Some(window) = focused {
        window.toggle_dev_tools();
    }
}

/// Toggles devtools on the selected instance's embedded view, not on the outer window.
pub fn toggle_content_dev_tools(focused: Option<&dyn Window>, content: &dyn ContentLookup) {
    if focused.is_none() {
        return;
    }
    let Some(host) = content.query(SELECTED_INSTANCE_HOST) else {
        debug!("no selected instance host");
        return;
    };
    let Some(view) = host.embedded_view() else {
        debug!("selected instance host has no embedded view");
        return;
    };

    if view.is_dev_tools_opened() {
        view.close_dev_tools();
    } else {
        view.open_dev_tools();
    }
}

pub fn open_report_issues(opener: &dyn UrlOpener) -> Result<()> {
    opener
        .open(ISSUES_URL)
        .with_context(|| format!("open {ISSUES_URL}"))
}

pub fn open_repository(opener: &dyn UrlOpener) -> Result<()> {
    opener
        .open(REPOSITORY_URL)
        .with_context(|| format!("open {REPOSITORY_URL}"))
}

pub fn maximize(focused: Option<&dyn Window>) {
    if let Some(window) = focused {
        window.maximize();
    }
}

/// Signals shutdown, then asks `window` to close. The close is a request; the
/// host may complete it later.
pub fn quit(signals: &dyn SignalChannel, window: Option<&dyn Window>) -> Result<()> {
    signals
        .send(HostEvent::ShutdownRequested, true)
        .context("request shutdown")?;
    if let Some(window) = window {
        window.close();
    }
    Ok(())
}
