use anyhow::{Context, Result};
use tracing::debug;
use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::HWND,
        UI::WindowsAndMessaging::{
            AppendMenuW, CreateAcceleratorTableW, CreateMenu, CreatePopupMenu, DestroyMenu,
            DrawMenuBar, SetMenu, ACCEL, ACCEL_VIRT_FLAGS, HACCEL, HMENU, MENU_ITEM_FLAGS,
            MF_POPUP, MF_SEPARATOR, MF_STRING,
        },
    },
};

use super::{role_command_id, windows_accelerators, windows_label};
use crate::menu::model::{MenuBar, MenuNode, Submenu};

/// Builds an HMENU bar for `bar`. `WM_COMMAND` ids go to
/// [`Dispatcher::activate_native`](crate::menu::Dispatcher::activate_native). The
/// caller owns the returned menu until it is attached to a window.
///
/// Labels only show shortcut hints; keyboard shortcuts need the table from
/// [`accelerator_table`] in the message loop.
pub fn build_menu_bar(bar: &MenuBar) -> Result<HMENU> {
    let menu = MenuGuard::new(unsafe { CreateMenu() }.context("CreateMenu")?);
    for section in &bar.sections {
        let popup = build_popup(section)?;
        append(menu.get(), MF_POPUP, popup.get().0 as usize, &section.label)
            .with_context(|| format!("AppendMenuW(section:{})", section.label))?;
        popup.release();
    }
    debug!(sections = bar.sections.len(), "built menu bar");
    Ok(menu.release())
}

/// Accelerator table for the shortcuts in `bar`. Pass it to `TranslateAcceleratorW`
/// in the window's message loop; it produces the same `WM_COMMAND` ids as the menu.
pub fn accelerator_table(bar: &MenuBar) -> Result<HACCEL> {
    let rows: Vec<ACCEL> = windows_accelerators(bar)
        .into_iter()
        .map(|row| ACCEL {
            fVirt: ACCEL_VIRT_FLAGS(row.flags),
            key: row.key,
            cmd: row.cmd,
        })
        .collect();
    let table = unsafe { CreateAcceleratorTableW(&rows) }.context("CreateAcceleratorTableW")?;
    debug!(entries = rows.len(), "built accelerator table");
    Ok(table)
}

/// Attaches `menu` to `hwnd`; the window takes ownership.
pub fn attach(hwnd: HWND, menu: HMENU) -> Result<()> {
    unsafe {
        SetMenu(hwnd, Some(menu)).context("SetMenu")?;
        DrawMenuBar(hwnd).context("DrawMenuBar")?;
    }
    Ok(())
}

/// Destroys the menu on drop unless released. Destroying a menu also destroys the
/// popups already appended to it.
struct MenuGuard {
    menu: HMENU,
    armed: bool,
}

impl MenuGuard {
    fn new(menu: HMENU) -> Self {
        Self { menu, armed: true }
    }

    fn get(&self) -> HMENU {
        self.menu
    }

    fn release(mut self) -> HMENU {
        self.armed = false;
        self.menu
    }
}

impl Drop for MenuGuard {
    fn drop(&mut self) {
        if self.armed {
            unsafe {
                let _ = DestroyMenu(self.menu);
            }
        }
    }
}

fn build_popup(sub: &Submenu) -> Result<MenuGuard> {
    let menu = MenuGuard::new(unsafe { CreatePopupMenu() }.context("CreatePopupMenu")?);
    for node in &sub.items {
        match node {
            MenuNode::Separator => unsafe {
                AppendMenuW(menu.get(), MF_SEPARATOR, 0, PCWSTR::null())
            }
            .context("AppendMenuW(separator)")?,
            MenuNode::Action(item) => {
                let label = windows_label(&item.label, item.accelerator.as_deref());
                append(menu.get(), MF_STRING, item.id.0 as usize, &label)
                    .with_context(|| format!("AppendMenuW({})", item.label))?;
            }
            MenuNode::Role(item) => {
                let label = windows_label(&item.label, item.accelerator.as_deref());
                append(menu.get(), MF_STRING, role_command_id(item.role) as usize, &label)
                    .with_context(|| format!("AppendMenuW({})", item.label))?;
            }
            MenuNode::Submenu(child) => {
                // Win32 has no services menu; an empty popup would render as a dead entry.
                if child.items.is_empty() {
                    continue;
                }
                let popup = build_popup(child)?;
                append(menu.get(), MF_POPUP, popup.get().0 as usize, &child.label)
                    .with_context(|| format!("AppendMenuW(submenu:{})", child.label))?;
                popup.release();
            }
        }
    }
    Ok(menu)
}

fn append(menu: HMENU, flags: MENU_ITEM_FLAGS, id: usize, label: &str) -> Result<()> {
    let wlabel = wide(label);
    unsafe { AppendMenuW(menu, flags, id, PCWSTR::from_raw(wlabel.as_ptr())) }?;
    Ok(())
}

fn wide(s: &str) -> Vec<u16> {
    let mut v: Vec<u16> = s.encode_utf16().collect();
    v.push(0);
    v
}
