use serde::Serialize;

use crate::host::WindowId;

/// Numeric tag carried by native menu items so a click can be routed back to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CommandId(pub u16);

pub const CMD_RELOAD: CommandId = CommandId(1000);
pub const CMD_TOGGLE_FULLSCREEN: CommandId = CommandId(1001);
pub const CMD_TOGGLE_DEVTOOLS: CommandId = CommandId(1002);
pub const CMD_TOGGLE_CONTENT_DEVTOOLS: CommandId = CommandId(1003);
pub const CMD_OPEN_REPOSITORY: CommandId = CommandId(1004);
pub const CMD_OPEN_REPORT_ISSUES: CommandId = CommandId(1005);
pub const CMD_MAXIMIZE: CommandId = CommandId(1006);
pub const CMD_QUIT: CommandId = CommandId(1007);
pub const CMD_PREFERENCES: CommandId = CommandId(1008);

/// Built-in menu behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reload,
    ToggleFullscreen,
    ToggleDevTools,
    /// Devtools of the selected instance's embedded view rather than the outer window.
    ToggleContentDevTools,
    OpenRepository,
    OpenReportIssues,
    Maximize,
    /// Signals shutdown, then closes the window the menu was built for.
    Quit { window: WindowId },
}

impl Command {
    pub fn id(self) -> CommandId {
        match self {
            Command::Reload => CMD_RELOAD,
            Command::ToggleFullscreen => CMD_TOGGLE_FULLSCREEN,
            Command::ToggleDevTools => CMD_TOGGLE_DEVTOOLS,
            Command::ToggleContentDevTools => CMD_TOGGLE_CONTENT_DEVTOOLS,
            Command::OpenRepository => CMD_OPEN_REPOSITORY,
            Command::OpenReportIssues => CMD_OPEN_REPORT_ISSUES,
            Command::Maximize => CMD_MAXIMIZE,
            Command::Quit { .. } => CMD_QUIT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::Reload => "reload",
            Command::ToggleFullscreen => "toggle-fullscreen",
            Command::ToggleDevTools => "toggle-devtools",
            Command::ToggleContentDevTools => "toggle-content-devtools",
            Command::OpenRepository => "open-repository",
            Command::OpenReportIssues => "open-report-issues",
            Command::Maximize => "maximize",
            Command::Quit { .. } => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let all = [
            Command::Reload,
            Command::ToggleFullscreen,
            Command::ToggleDevTools,
            Command::ToggleContentDevTools,
            Command::OpenRepository,
            Command::OpenReportIssues,
            Command::Maximize,
            Command::Quit { window: WindowId(1) },
        ];
        let mut ids = all.iter().map(|c| c.id()).collect::<Vec<_>>();
        ids.push(CMD_PREFERENCES);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all.len() + 1);
    }
}
