use tracing::debug;

use super::commands::{Command, CMD_PREFERENCES};
use super::model::{ActionItem, BuiltMenu, MenuBar, MenuNode, PreferencesSlot, Role, Submenu};
use crate::host::WindowId;
use crate::platform::Platform;

/// Base sections, kept as named fields so platform edits index them directly.
struct Template {
    edit: Submenu,
    view: Submenu,
    window: Submenu,
    developer: Submenu,
    help: Submenu,
}

impl Template {
    fn new(platform: &Platform) -> Self {
        let mac = platform.is_mac();
        let pick = |on_mac: &'static str, other: &'static str| if mac { on_mac } else { other };

        Self {
            edit: Submenu::new(
                "Edit",
                vec![
                    MenuNode::role("Undo", Some("CmdOrCtrl+Z"), Role::Undo),
                    MenuNode::role("Redo", Some("Shift+CmdOrCtrl+Z"), Role::Redo),
                    MenuNode::Separator,
                    MenuNode::role("Cut", Some("CmdOrCtrl+X"), Role::Cut),
                    MenuNode::role("Copy", Some("CmdOrCtrl+C"), Role::Copy),
                    MenuNode::role("Paste", Some("CmdOrCtrl+V"), Role::Paste),
                    MenuNode::role("Select All", Some("CmdOrCtrl+A"), Role::SelectAll),
                ],
            ),
            view: Submenu::new(
                "View",
                vec![
                    MenuNode::action("Reload", Some("CmdOrCtrl+R"), Command::Reload),
                    MenuNode::action(
                        "Toggle Full Screen",
                        Some(pick("Ctrl+Command+F", "F11")),
                        Command::ToggleFullscreen,
                    ),
                ],
            ),
            window: Submenu::new(
                "Window",
                vec![
                    MenuNode::role("Minimize", Some("CmdOrCtrl+M"), Role::Minimize),
                    MenuNode::role("Close", Some("CmdOrCtrl+W"), Role::Close),
                ],
            )
            .with_role(Role::Window),
            developer: Submenu::new(
                "Developer",
                vec![
                    MenuNode::action(
                        "Toggle Developer Tools",
                        Some(pick("Alt+Command+I", "Ctrl+Shift+I")),
                        Command::ToggleDevTools,
                    ),
                    MenuNode::action(
                        "Toggle Developer Tools (Current Blog)",
                        Some(pick("Alt+Command+Shift+I", "Ctrl+Alt+Shift+I")),
                        Command::ToggleContentDevTools,
                    ),
                    MenuNode::action("Repository", None, Command::OpenRepository),
                ],
            ),
            help: Submenu::new(
                "Help",
                vec![
                    MenuNode::action("Learn More", None, Command::OpenRepository),
                    MenuNode::action("Report Issues", None, Command::OpenReportIssues),
                ],
            )
            .with_role(Role::Help),
        }
    }

    fn into_sections(self, leading: Option<Submenu>) -> Vec<Submenu> {
        leading
            .into_iter()
            .chain([self.edit, self.view, self.window, self.developer, self.help])
            .collect()
    }
}

const PREFERENCES_LABEL: &str = "Preferences";
const PREFERENCES_ACCELERATOR: &str = "CmdOrCtrl+,";

fn preferences_item() -> MenuNode {
    MenuNode::Action(ActionItem::slot(
        PREFERENCES_LABEL,
        Some(PREFERENCES_ACCELERATOR),
        CMD_PREFERENCES,
    ))
}

fn app_section(app_name: &str, current: WindowId) -> Submenu {
    Submenu::new(
        app_name,
        vec![
            MenuNode::role(&format!("About {app_name}"), None, Role::About),
            MenuNode::Separator,
            preferences_item(),
            MenuNode::Separator,
            MenuNode::Submenu(Submenu::new("Services", Vec::new()).with_role(Role::Services)),
            MenuNode::Separator,
            MenuNode::role(&format!("Hide {app_name}"), Some("Command+H"), Role::Hide),
            MenuNode::role("Hide Others", Some("Command+Alt+H"), Role::HideOthers),
            MenuNode::role("Show All", None, Role::Unhide),
            MenuNode::Separator,
            MenuNode::action("Quit", Some("Command+Q"), Command::Quit { window: current }),
        ],
    )
}

fn file_section(current: WindowId) -> Submenu {
    Submenu::new(
        "File",
        vec![
            preferences_item(),
            MenuNode::Separator,
            MenuNode::role("Close", Some("CmdOrCtrl+W"), Role::Close),
            MenuNode::action("Quit", Some("CmdOrCtrl+Q"), Command::Quit { window: current }),
        ],
    )
}

/// Assembles the application menu for `platform`.
///
/// macOS gets a leading app section named after `app_name`. Windows and Linux get a
/// leading File section, a Maximize item and an About entry under Help. Any other
/// platform gets the base template untouched. Preferences is left unwired; the
/// returned slot is where the account switcher attaches its handler.
pub fn build(platform: &Platform, app_name: &str, current: WindowId) -> BuiltMenu {
    let mut template = Template::new(platform);

    let (sections, preferences) = match platform {
        Platform::MacOs => {
            let sections = template.into_sections(Some(app_section(app_name, current)));
            (sections, Some(PreferencesSlot::new(0, 2)))
        }
        Platform::Windows | Platform::Linux => {
            template.window.items.insert(
                1,
                MenuNode::action("Maximize", None, Command::Maximize),
            );
            template.help.items.extend([
                MenuNode::Separator,
                MenuNode::role(&format!("About {app_name}"), None, Role::About),
            ]);
            let sections = template.into_sections(Some(file_section(current)));
            (sections, Some(PreferencesSlot::new(0, 0)))
        }
        Platform::Other(_) => (template.into_sections(None), None),
    };

    debug!(%platform, sections = sections.len(), "built application menu");

    BuiltMenu {
        bar: MenuBar { sections },
        preferences,
    }
}
