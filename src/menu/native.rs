//! Renders a [`MenuBar`](super::model::MenuBar) into the OS menu API.
//!
//! macOS gets an NSMenu main menu, Windows an HMENU bar plus an accelerator table.
//! Action items carry their [`CommandId`] as the native tag; Windows role items carry
//! `ROLE_COMMAND_BASE + role index` since Win32 has no predefined roles. Both kinds
//! of tag go back through [`Dispatcher::activate_native`](super::Dispatcher::activate_native).

use tracing::debug;

use super::accelerator::{Accelerator, Key};
use super::commands::CommandId;
use super::model::{MenuBar, MenuNode, Role};

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "macos")]
pub use self::macos::install;
#[cfg(target_os = "windows")]
pub use self::windows::{accelerator_table, attach, build_menu_bar};

pub const ROLE_COMMAND_BASE: u16 = 2000;

/// What a native command tag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeCommand {
    Item(CommandId),
    Role(Role),
}

pub fn role_command_id(role: Role) -> u16 {
    ROLE_COMMAND_BASE + role.index()
}

pub fn decode_command(tag: u16) -> Option<NativeCommand> {
    if tag >= ROLE_COMMAND_BASE {
        return Role::from_index(tag - ROLE_COMMAND_BASE).map(NativeCommand::Role);
    }
    (tag != 0).then_some(NativeCommand::Item(CommandId(tag)))
}

/// Standard AppKit selector for a role. Roles that only name a submenu
/// (window, help, services) have none.
pub fn role_selector(role: Role) -> Option<&'static str> {
    let sel = match role {
        Role::Undo => "undo:",
        Role::Redo => "redo:",
        Role::Cut => "cut:",
        Role::Copy => "copy:",
        Role::Paste => "paste:",
        Role::SelectAll => "selectAll:",
        Role::Minimize => "performMiniaturize:",
        Role::Close => "performClose:",
        Role::About => "orderFrontStandardAboutPanel:",
        Role::Hide => "hide:",
        Role::HideOthers => "hideOtherApplications:",
        Role::Unhide => "unhideAllApplications:",
        Role::Quit => "terminate:",
        Role::Window | Role::Help | Role::Services => return None,
    };
    Some(sel)
}

// NSEventModifierFlags
pub const MAC_MOD_SHIFT: u64 = 1 << 17;
pub const MAC_MOD_CONTROL: u64 = 1 << 18;
pub const MAC_MOD_OPTION: u64 = 1 << 19;
pub const MAC_MOD_COMMAND: u64 = 1 << 20;

const NS_F1_FUNCTION_KEY: u32 = 0xF704;

/// AppKit key equivalent and modifier mask for an accelerator.
pub fn mac_key_equivalent(accel: &Accelerator) -> (String, u64) {
    let m = &accel.modifiers;
    let mut mask = 0;
    if m.command || m.cmd_or_ctrl {
        mask |= MAC_MOD_COMMAND;
    }
    if m.control {
        mask |= MAC_MOD_CONTROL;
    }
    if m.alt {
        mask |= MAC_MOD_OPTION;
    }
    if m.shift {
        mask |= MAC_MOD_SHIFT;
    }

    let key = match accel.key {
        Key::Char(c) => c.to_string(),
        Key::Function(n) => char::from_u32(NS_F1_FUNCTION_KEY + u32::from(n) - 1)
            .map(String::from)
            .unwrap_or_default(),
    };
    (key, mask)
}

/// Windows menu text: label plus a tab-separated shortcut hint.
pub fn windows_label(label: &str, accelerator: Option<&str>) -> String {
    match accelerator.and_then(|a| Accelerator::parse(a).ok()) {
        Some(accel) => format!("{label}\t{}", accel.display()),
        None => label.to_string(),
    }
}

// ACCEL fVirt bits.
pub const WIN_FVIRTKEY: u8 = 0x01;
pub const WIN_FSHIFT: u8 = 0x04;
pub const WIN_FCONTROL: u8 = 0x08;
pub const WIN_FALT: u8 = 0x10;

/// One row of a Win32 accelerator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinAccel {
    pub flags: u8,
    pub key: u16,
    pub cmd: u16,
}

/// Virtual-key code for `key`, if it has one.
pub fn windows_virtual_key(key: Key) -> Option<u16> {
    let vk = match key {
        Key::Function(n) => 0x70 + u16::from(n) - 1,
        Key::Char(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as u16,
        Key::Char(' ') => 0x20,
        Key::Char('+' | '=') => 0xBB,
        Key::Char(',') => 0xBC,
        Key::Char('-') => 0xBD,
        Key::Char('.') => 0xBE,
        _ => return None,
    };
    Some(vk)
}

/// Accelerator table rows for every action and role item in `bar`.
///
/// Entries using the Command modifier or a key without a virtual-key code are
/// skipped, as are unparseable accelerators.
pub fn windows_accelerators(bar: &MenuBar) -> Vec<WinAccel> {
    fn walk(items: &[MenuNode], out: &mut Vec<WinAccel>) {
        for node in items {
            let (accelerator, cmd) = match node {
                MenuNode::Action(item) => (item.accelerator.as_deref(), item.id.0),
                MenuNode::Role(item) => (item.accelerator.as_deref(), role_command_id(item.role)),
                MenuNode::Submenu(sub) => {
                    walk(&sub.items, out);
                    continue;
                }
                MenuNode::Separator => continue,
            };
            let Some(raw) = accelerator else {
                continue;
            };
            match Accelerator::parse(raw).ok().and_then(|a| windows_accel(&a, cmd)) {
                Some(row) => out.push(row),
                None => debug!(accelerator = raw, "no Win32 accelerator"),
            }
        }
    }

    let mut out = Vec::new();
    for section in &bar.sections {
        walk(&section.items, &mut out);
    }
    out
}

fn windows_accel(accel: &Accelerator, cmd: u16) -> Option<WinAccel> {
    let m = &accel.modifiers;
    if m.command {
        return None;
    }
    let mut flags = WIN_FVIRTKEY;
    if m.control || m.cmd_or_ctrl {
        flags |= WIN_FCONTROL;
    }
    if m.alt {
        flags |= WIN_FALT;
    }
    if m.shift {
        flags |= WIN_FSHIFT;
    }
    Some(WinAccel {
        flags,
        key: windows_virtual_key(accel.key)?,
        cmd,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_item_and_role_tags() {
        assert_eq!(
            decode_command(1007),
            Some(NativeCommand::Item(CommandId(1007)))
        );
        assert_eq!(
            decode_command(role_command_id(Role::Close)),
            Some(NativeCommand::Role(Role::Close))
        );
        assert_eq!(decode_command(0), None);
        assert_eq!(decode_command(ROLE_COMMAND_BASE + 500), None);
    }

    #[test]
    fn every_role_round_trips_through_tag() {
        for role in Role::ALL {
            assert_eq!(
                decode_command(role_command_id(role)),
                Some(NativeCommand::Role(role))
            );
        }
    }

    #[test]
    fn leaf_roles_have_selectors() {
        assert_eq!(role_selector(Role::SelectAll), Some("selectAll:"));
        assert_eq!(role_selector(Role::HideOthers), Some("hideOtherApplications:"));
        assert_eq!(role_selector(Role::Services), None);
    }

    #[test]
    fn mac_key_equivalents() {
        let (key, mask) = mac_key_equivalent(&Accelerator::parse("Shift+CmdOrCtrl+Z").unwrap());
        assert_eq!(key, "z");
        assert_eq!(mask, MAC_MOD_COMMAND | MAC_MOD_SHIFT);

        let (key, mask) = mac_key_equivalent(&Accelerator::parse("Ctrl+Command+F").unwrap());
        assert_eq!(key, "f");
        assert_eq!(mask, MAC_MOD_COMMAND | MAC_MOD_CONTROL);

        let (key, mask) = mac_key_equivalent(&Accelerator::parse("F11").unwrap());
        assert_eq!(key, "\u{F70E}");
        assert_eq!(mask, 0);
    }

    #[test]
    fn windows_labels_carry_shortcut_hint() {
        assert_eq!(windows_label("Reload", Some("CmdOrCtrl+R")), "Reload\tCtrl+R");
        assert_eq!(
            windows_label("Redo", Some("Shift+CmdOrCtrl+Z")),
            "Redo\tCtrl+Shift+Z"
        );
        assert_eq!(windows_label("Repository", None), "Repository");
        assert_eq!(windows_label("Odd", Some("Ctrl+Nope")), "Odd");
    }

    #[test]
    fn virtual_keys() {
        assert_eq!(windows_virtual_key(Key::Char('r')), Some(0x52));
        assert_eq!(windows_virtual_key(Key::Function(11)), Some(0x7A));
        assert_eq!(windows_virtual_key(Key::Char(',')), Some(0xBC));
        assert_eq!(windows_virtual_key(Key::Char('`')), None);
    }

    #[test]
    fn windows_menu_shortcuts_become_accelerator_rows() {
        use crate::host::WindowId;
        use crate::menu::builder::build;
        use crate::menu::commands::{CMD_QUIT, CMD_RELOAD, CMD_TOGGLE_FULLSCREEN};
        use crate::platform::Platform;

        let menu = build(&Platform::Windows, "Ghost", WindowId(1));
        let rows = windows_accelerators(&menu.bar);

        let row = |cmd: u16| rows.iter().find(|r| r.cmd == cmd).copied();
        assert_eq!(
            row(CMD_RELOAD.0),
            Some(WinAccel {
                flags: WIN_FVIRTKEY | WIN_FCONTROL,
                key: 0x52,
                cmd: CMD_RELOAD.0,
            })
        );
        assert_eq!(
            row(CMD_TOGGLE_FULLSCREEN.0).map(|r| (r.flags, r.key)),
            Some((WIN_FVIRTKEY, 0x7A))
        );
        assert_eq!(row(CMD_QUIT.0).map(|r| r.key), Some(0x51));
        assert_eq!(
            row(role_command_id(Role::Redo)).map(|r| r.flags),
            Some(WIN_FVIRTKEY | WIN_FCONTROL | WIN_FSHIFT)
        );
    }

    #[test]
    fn command_only_shortcuts_are_skipped() {
        use crate::host::WindowId;
        use crate::menu::builder::build;
        use crate::platform::Platform;

        let menu = build(&Platform::MacOs, "Ghost", WindowId(1));
        let rows = windows_accelerators(&menu.bar);
        assert!(rows.iter().all(|r| r.cmd != role_command_id(Role::Hide)));
        assert!(rows.iter().any(|r| r.cmd == role_command_id(Role::Copy)));
    }
}
