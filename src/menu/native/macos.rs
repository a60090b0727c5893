use std::{ffi::c_void, sync::Once};

use anyhow::{anyhow, Result};
use cocoa::{
    appkit::NSApp,
    base::{id, nil},
    foundation::{NSInteger, NSString, NSUInteger},
};
use objc::{
    class,
    declare::ClassDecl,
    msg_send,
    runtime::{Class, Object, Sel},
    sel, sel_impl,
};
use tracing::{debug, warn};

use super::{mac_key_equivalent, role_selector};
use crate::menu::accelerator::Accelerator;
use crate::menu::commands::CommandId;
use crate::menu::model::{MenuBar, MenuNode, Role, Submenu};

type Handler = Box<dyn FnMut(CommandId)>;

/// Installs `bar` as the application's main menu. Clicks on action items call
/// `on_command` with the item's id on the main thread; role items go straight to
/// the responder chain.
///
/// Must be called on the main thread after `NSApp` exists. The handler lives for
/// the rest of the process.
pub fn install(bar: &MenuBar, on_command: impl FnMut(CommandId) + 'static) -> Result<()> {
    let handler: Box<Handler> = Box::new(Box::new(on_command));
    let target = new_target(Box::into_raw(handler))?;

    unsafe {
        let app = NSApp();
        let main_menu = new_menu("");

        for section in &bar.sections {
            let submenu = build_submenu(section, target);
            let holder = new_item(&section.label, None);
            let _: () = msg_send![holder, setSubmenu: submenu];
            let _: () = msg_send![main_menu, addItem: holder];

            match section.role {
                Some(Role::Window) => {
                    let _: () = msg_send![app, setWindowsMenu: submenu];
                }
                Some(Role::Help) => {
                    let _: () = msg_send![app, setHelpMenu: submenu];
                }
                _ => {}
            }
        }

        let _: () = msg_send![app, setMainMenu: main_menu];
    }

    debug!(sections = bar.sections.len(), "installed main menu");
    Ok(())
}

unsafe fn build_submenu(sub: &Submenu, target: id) -> id {
    let menu = new_menu(&sub.label);
    for node in &sub.items {
        let item: id = match node {
            MenuNode::Separator => msg_send![class!(NSMenuItem), separatorItem],
            MenuNode::Action(action) => {
                let item = new_item(&action.label, Some(sel!(onMenuItem:)));
                apply_accelerator(item, action.accelerator.as_deref());
                let _: () = msg_send![item, setTarget: target];
                let _: () = msg_send![item, setTag: action.id.0 as NSInteger];
                item
            }
            MenuNode::Role(role_item) => {
                let action = role_selector(role_item.role).map(Sel::register);
                let item = new_item(&role_item.label, action);
                apply_accelerator(item, role_item.accelerator.as_deref());
                item
            }
            MenuNode::Submenu(child) => {
                let child_menu = build_submenu(child, target);
                let item = new_item(&child.label, None);
                let _: () = msg_send![item, setSubmenu: child_menu];
                if child.role == Some(Role::Services) {
                    let _: () = msg_send![NSApp(), setServicesMenu: child_menu];
                }
                item
            }
        };
        let _: () = msg_send![menu, addItem: item];
    }
    menu
}

unsafe fn apply_accelerator(item: id, accelerator: Option<&str>) {
    let Some(raw) = accelerator else {
        return;
    };
    match Accelerator::parse(raw) {
        Ok(accel) => {
            let (key, mask) = mac_key_equivalent(&accel);
            let _: () = msg_send![item, setKeyEquivalent: nsstring(&key)];
            let _: () = msg_send![item, setKeyEquivalentModifierMask: mask as NSUInteger];
        }
        Err(e) => warn!(accelerator = raw, error = %e, "skipping accelerator"),
    }
}

unsafe fn nsstring(s: &str) -> id {
    NSString::alloc(nil).init_str(s)
}

unsafe fn new_menu(title: &str) -> id {
    let menu: id = msg_send![class!(NSMenu), alloc];
    let menu: id = msg_send![menu, initWithTitle: nsstring(title)];
    menu
}

unsafe fn new_item(title: &str, action: Option<Sel>) -> id {
    let item: id = msg_send![class!(NSMenuItem), alloc];
    let title = nsstring(title);
    let empty = nsstring("");
    match action {
        Some(action) => msg_send![item, initWithTitle: title action: action keyEquivalent: empty],
        None => {
            let none: *const c_void = std::ptr::null();
            msg_send![item, initWithTitle: title action: none keyEquivalent: empty]
        }
    }
}

const TARGET_CLASS: &str = "ShellMenuTarget";

fn target_class() -> *const Class {
    static ONCE: Once = Once::new();
    static mut CLS: *const Class = std::ptr::null();

    ONCE.call_once(|| unsafe {
        let ns_object = class!(NSObject);
        let Some(mut decl) = ClassDecl::new(TARGET_CLASS, ns_object) else {
            // Registered by an earlier copy of this library in the process.
            CLS = Class::get(TARGET_CLASS).map_or(std::ptr::null(), |c| c as *const Class);
            return;
        };
        decl.add_ivar::<*mut c_void>("handler_ptr");
        decl.add_method(
            sel!(onMenuItem:),
            on_menu_item as extern "C" fn(&Object, Sel, id),
        );
        CLS = decl.register();
    });

    unsafe { CLS }
}

fn new_target(handler: *mut Handler) -> Result<id> {
    let cls = target_class();
    if cls.is_null() {
        return Err(anyhow!("could not register {TARGET_CLASS}"));
    }
    unsafe {
        let obj: id = msg_send![cls, new];
        (*obj).set_ivar("handler_ptr", handler as *mut c_void);
        Ok(obj)
    }
}

extern "C" fn on_menu_item(this: &Object, _cmd: Sel, sender: id) {
    unsafe {
        let handler_ptr: *mut c_void = *this.get_ivar("handler_ptr");
        if handler_ptr.is_null() {
            return;
        }
        let handler = &mut *(handler_ptr as *mut Handler);
        let tag: NSInteger = msg_send![sender, tag];
        handler(CommandId(tag as u16));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::WindowId;
    use crate::menu::build;
    use crate::menu::commands::{CMD_RELOAD, CMD_TOGGLE_FULLSCREEN};
    use crate::menu::native::{MAC_MOD_COMMAND, MAC_MOD_CONTROL};
    use crate::platform::Platform;

    #[test]
    fn view_submenu_carries_tags_and_key_equivalents() {
        let menu = build(&Platform::MacOs, "Ghost", WindowId(1));
        let view = menu.bar.section("View").unwrap();
        let handler: Box<Handler> = Box::new(Box::new(|_: CommandId| {}));
        let target = new_target(Box::into_raw(handler)).unwrap();

        unsafe {
            let submenu = build_submenu(view, target);
            let count: NSInteger = msg_send![submenu, numberOfItems];
            assert_eq!(count as usize, view.items.len());

            let reload: id = msg_send![submenu, itemAtIndex: 0 as NSInteger];
            let tag: NSInteger = msg_send![reload, tag];
            assert_eq!(tag as u16, CMD_RELOAD.0);

            let full_screen: id = msg_send![submenu, itemAtIndex: 1 as NSInteger];
            let tag: NSInteger = msg_send![full_screen, tag];
            assert_eq!(tag as u16, CMD_TOGGLE_FULLSCREEN.0);
            let mask: NSUInteger = msg_send![full_screen, keyEquivalentModifierMask];
            assert_eq!(mask as u64, MAC_MOD_COMMAND | MAC_MOD_CONTROL);
        }
    }
}
