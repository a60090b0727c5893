use anyhow::Result;
use tracing::{debug, warn};

use super::commands::{Command, CommandId};
use super::handlers;
use super::model::{Action, ActionItem, MenuBar, Role};
use super::native::{decode_command, NativeCommand};
use crate::config::RunMode;
use crate::host::{EditAction, HostServices, Window};
use crate::platform::Platform;

/// Routes menu activations to handlers. Holds only borrowed host capabilities
/// and is cheap to create per event.
pub struct Dispatcher<'a> {
    host: HostServices<'a>,
    platform: Platform,
    mode: RunMode,
}

impl<'a> Dispatcher<'a> {
    pub fn new(host: HostServices<'a>, platform: Platform, mode: RunMode) -> Self {
        Self {
            host,
            platform,
            mode,
        }
    }

    /// Runs the item's action. Handler failures are logged, not returned: a menu
    /// click has nowhere to report them.
    pub fn activate(&self, item: &ActionItem, focused: Option<&dyn Window>) {
        match &item.action {
            Some(Action::Builtin(cmd)) => {
                debug!(command = cmd.name(), label = %item.label, "menu command");
                if let Err(e) = self.run(*cmd, focused) {
                    warn!(command = cmd.name(), error = %format!("{e:#}"), "menu command failed");
                }
            }
            Some(Action::Custom(custom)) => {
                debug!(label = %item.label, "menu callback");
                custom.call(item, focused);
            }
            None => debug!(label = %item.label, "menu item has no handler attached"),
        }
    }

    /// Entry point for native menus, which only hand back the numeric tag.
    /// Returns `false` for ids not present in `bar`.
    pub fn activate_id(&self, bar: &MenuBar, id: CommandId, focused: Option<&dyn Window>) -> bool {
        match bar.find_action(id) {
            Some(item) => {
                self.activate(item, focused);
                true
            }
            None => {
                debug!(id = id.0, "unknown menu command id");
                false
            }
        }
    }

    /// Entry point for renderers that tag role items too (Win32 `WM_COMMAND`).
    /// Returns `false` when the tag matches nothing in `bar` or names a role this
    /// host cannot perform.
    pub fn activate_native(&self, bar: &MenuBar, tag: u16, focused: Option<&dyn Window>) -> bool {
        match decode_command(tag) {
            Some(NativeCommand::Item(id)) => self.activate_id(bar, id, focused),
            Some(NativeCommand::Role(role)) if bar.contains_role(role) => {
                self.activate_role(role, focused)
            }
            _ => {
                debug!(tag, "unknown native menu tag");
                false
            }
        }
    }

    /// Performs a role the OS menu does not handle itself. A missing window is a
    /// no-op but still counts as handled.
    pub fn activate_role(&self, role: Role, focused: Option<&dyn Window>) -> bool {
        let Some(action) = RoleAction::for_role(role) else {
            debug!(?role, "role has no host action");
            return false;
        };
        debug!(?role, "menu role");
        if let Some(window) = focused {
            action.apply(window);
        }
        true
    }

    fn run(&self, cmd: Command, focused: Option<&dyn Window>) -> Result<()> {
        match cmd {
            Command::Reload => {
                handlers::reload(focused, &self.platform, self.mode, self.host.signals)
            }
            Command::ToggleFullscreen => {
                handlers::toggle_fullscreen(focused);
                Ok(())
            }
            Command::ToggleDevTools => {
                handlers::toggle_dev_tools(focused);
                Ok(())
            }
            Command::ToggleContentDevTools => {
                handlers::toggle_content_dev_tools(focused, self.host.content);
                Ok(())
            }
            Command::OpenRepository => handlers::open_repository(self.host.opener),
            Command::OpenReportIssues => handlers::open_report_issues(self.host.opener),
            Command::Maximize => {
                handlers::maximize(focused);
                Ok(())
            }
            Command::Quit { window } => {
                let target = self.host.windows.window(window);
                if target.is_none() {
                    debug!(%window, "quit: menu window already gone");
                }
                handlers::quit(self.host.signals, target)
            }
        }
    }
}

enum RoleAction {
    Close,
    Minimize,
    Edit(EditAction),
}

impl RoleAction {
    fn for_role(role: Role) -> Option<Self> {
        let action = match role {
            Role::Close => RoleAction::Close,
            Role::Minimize => RoleAction::Minimize,
            Role::Undo => RoleAction::Edit(EditAction::Undo),
            Role::Redo => RoleAction::Edit(EditAction::Redo),
            Role::Cut => RoleAction::Edit(EditAction::Cut),
            Role::Copy => RoleAction::Edit(EditAction::Copy),
            Role::Paste => RoleAction::Edit(EditAction::Paste),
            Role::SelectAll => RoleAction::Edit(EditAction::SelectAll),
            _ => return None,
        };
        Some(action)
    }

    fn apply(self, window: &dyn Window) {
        match self {
            RoleAction::Close => window.close(),
            RoleAction::Minimize => window.minimize(),
            RoleAction::Edit(edit) => window.edit(edit),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::host::WindowId;
    use crate::menu::builder::build;
    use crate::menu::commands::{CMD_PREFERENCES, CMD_QUIT, CMD_RELOAD};
    use crate::menu::handlers::testing::*;
    use crate::menu::native::role_command_id;

    struct Fixture<'a> {
        window: FakeWindow<'a>,
        signals: FakeSignals<'a>,
        opener: FakeOpener<'a>,
        content: FakeContent<'a>,
    }

    impl<'a> Fixture<'a> {
        fn new(log: &'a Log) -> Self {
            Self {
                window: FakeWindow::new(1, log),
                signals: FakeSignals { log, fail: false },
                opener: FakeOpener { log },
                content: FakeContent::empty(),
            }
        }

        fn dispatcher(&self, platform: Platform, mode: RunMode) -> Dispatcher<'_> {
            Dispatcher::new(
                HostServices {
                    signals: &self.signals,
                    opener: &self.opener,
                    content: &self.content,
                    windows: &self.window,
                },
                platform,
                mode,
            )
        }
    }

    #[test]
    fn quit_from_file_menu_signals_then_closes_menu_window() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::Linux, "Ghost", WindowId(1));
        let d = fx.dispatcher(Platform::Linux, RunMode::Production);

        assert!(d.activate_id(&menu.bar, CMD_QUIT, None));
        assert_eq!(*log.borrow(), ["send:shutdown-requested:true", "1:close"]);
    }

    #[test]
    fn quit_still_signals_when_window_is_gone() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::MacOs, "Ghost", WindowId(99));
        let d = fx.dispatcher(Platform::MacOs, RunMode::Production);

        assert!(d.activate_id(&menu.bar, CMD_QUIT, Some(&fx.window)));
        assert_eq!(*log.borrow(), ["send:shutdown-requested:true"]);
    }

    #[test]
    fn reload_follows_platform_rule() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::MacOs, "Ghost", WindowId(1));

        fx.dispatcher(Platform::MacOs, RunMode::Production)
            .activate_id(&menu.bar, CMD_RELOAD, Some(&fx.window));
        fx.dispatcher(Platform::MacOs, RunMode::Test)
            .activate_id(&menu.bar, CMD_RELOAD, Some(&fx.window));

        assert_eq!(
            *log.borrow(),
            ["send:soft-restart-requested:true", "1:reload"]
        );
    }

    #[test]
    fn unwired_preferences_is_a_no_op() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::Windows, "Ghost", WindowId(1));
        let d = fx.dispatcher(Platform::Windows, RunMode::Production);

        assert!(d.activate_id(&menu.bar, CMD_PREFERENCES, Some(&fx.window)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn attached_preferences_receives_item_and_window() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let mut menu = build(&Platform::MacOs, "Ghost", WindowId(1));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        assert!(menu.attach_preferences(move |item, window| {
            sink.borrow_mut()
                .push((item.label.clone(), window.map(|w| w.is_full_screen())));
        }));

        let d = fx.dispatcher(Platform::MacOs, RunMode::Production);
        assert!(d.activate_id(&menu.bar, CMD_PREFERENCES, Some(&fx.window)));
        assert_eq!(*seen.borrow(), [("Preferences".to_string(), Some(false))]);
    }

    #[test]
    fn unknown_id_is_ignored() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::Other("haiku".into()), "Ghost", WindowId(1));
        let d = fx.dispatcher(Platform::Other("haiku".into()), RunMode::Production);

        // The base template has no Quit item.
        assert!(!d.activate_id(&menu.bar, CMD_QUIT, Some(&fx.window)));
        assert!(!d.activate_id(&menu.bar, CommandId(4242), Some(&fx.window)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn failing_signal_is_swallowed() {
        let log = Log::default();
        let mut fx = Fixture::new(&log);
        fx.signals.fail = true;
        let menu = build(&Platform::Linux, "Ghost", WindowId(1));
        let d = fx.dispatcher(Platform::Linux, RunMode::Production);

        assert!(d.activate_id(&menu.bar, CMD_QUIT, Some(&fx.window)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn windows_role_tags_reach_the_window() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::Windows, "Ghost", WindowId(1));
        let d = fx.dispatcher(Platform::Windows, RunMode::Production);

        for role in [
            Role::Undo,
            Role::Redo,
            Role::Cut,
            Role::Copy,
            Role::Paste,
            Role::SelectAll,
            Role::Minimize,
            Role::Close,
        ] {
            assert!(
                d.activate_native(&menu.bar, role_command_id(role), Some(&fx.window)),
                "{role:?}"
            );
        }
        assert_eq!(
            *log.borrow(),
            [
                "1:edit(undo)",
                "1:edit(redo)",
                "1:edit(cut)",
                "1:edit(copy)",
                "1:edit(paste)",
                "1:edit(select-all)",
                "1:minimize",
                "1:close",
            ]
        );
    }

    #[test]
    fn native_item_tags_go_through_commands() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::Windows, "Ghost", WindowId(1));
        let d = fx.dispatcher(Platform::Windows, RunMode::Production);

        assert!(d.activate_native(&menu.bar, CMD_QUIT.0, Some(&fx.window)));
        assert_eq!(*log.borrow(), ["send:shutdown-requested:true", "1:close"]);
    }

    #[test]
    fn native_role_tags_outside_the_menu_are_ignored() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::Windows, "Ghost", WindowId(1));
        let d = fx.dispatcher(Platform::Windows, RunMode::Production);

        // Hide only exists in the macOS app section.
        assert!(!d.activate_native(&menu.bar, role_command_id(Role::Hide), Some(&fx.window)));
        // About is in the menu but has no host action.
        assert!(!d.activate_native(&menu.bar, role_command_id(Role::About), Some(&fx.window)));
        assert!(!d.activate_native(&menu.bar, 0, Some(&fx.window)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn role_without_window_is_handled_silently() {
        let log = Log::default();
        let fx = Fixture::new(&log);
        let menu = build(&Platform::Linux, "Ghost", WindowId(1));
        let d = fx.dispatcher(Platform::Linux, RunMode::Production);

        assert!(d.activate_native(&menu.bar, role_command_id(Role::Copy), None));
        assert!(log.borrow().is_empty());
    }
}
