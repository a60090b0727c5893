use std::{fmt, rc::Rc};

use serde::{Serialize, Serializer};

use super::commands::{Command, CommandId};
use crate::host::Window;

/// Host-predefined behavior. The host implements these; the menu only names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Minimize,
    Close,
    About,
    Hide,
    HideOthers,
    Unhide,
    Quit,
    Window,
    Help,
    Services,
}

impl Role {
    pub const ALL: [Role; 16] = [
        Role::Undo,
        Role::Redo,
        Role::Cut,
        Role::Copy,
        Role::Paste,
        Role::SelectAll,
        Role::Minimize,
        Role::Close,
        Role::About,
        Role::Hide,
        Role::HideOthers,
        Role::Unhide,
        Role::Quit,
        Role::Window,
        Role::Help,
        Role::Services,
    ];

    pub fn index(self) -> u16 {
        Role::ALL
            .iter()
            .position(|r| *r == self)
            .unwrap_or_default() as u16
    }

    pub fn from_index(index: u16) -> Option<Role> {
        Role::ALL.get(index as usize).copied()
    }
}

/// Callback attached to an item after the menu was built.
pub type Callback = dyn Fn(&ActionItem, Option<&dyn Window>);

#[derive(Clone)]
pub struct CustomAction(Rc<Callback>);

impl CustomAction {
    pub fn new(f: impl Fn(&ActionItem, Option<&dyn Window>) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, item: &ActionItem, focused: Option<&dyn Window>) {
        (self.0)(item, focused)
    }
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomAction(..)")
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Builtin(Command),
    Custom(CustomAction),
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionItem {
    pub id: CommandId,
    pub label: String,
    pub accelerator: Option<String>,
    /// `None` marks a slot another feature wires up later.
    #[serde(serialize_with = "serialize_action")]
    pub action: Option<Action>,
}

impl ActionItem {
    pub fn builtin(label: impl Into<String>, accelerator: Option<&str>, command: Command) -> Self {
        Self {
            id: command.id(),
            label: label.into(),
            accelerator: accelerator.map(str::to_string),
            action: Some(Action::Builtin(command)),
        }
    }

    pub fn slot(label: impl Into<String>, accelerator: Option<&str>, id: CommandId) -> Self {
        Self {
            id,
            label: label.into(),
            accelerator: accelerator.map(str::to_string),
            action: None,
        }
    }
}

fn serialize_action<S: Serializer>(action: &Option<Action>, s: S) -> Result<S::Ok, S::Error> {
    match action {
        None => s.serialize_none(),
        Some(Action::Builtin(cmd)) => s.serialize_some(cmd.name()),
        Some(Action::Custom(_)) => s.serialize_some("custom"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleItem {
    pub label: String,
    pub accelerator: Option<String>,
    pub role: Role,
}

impl RoleItem {
    pub fn new(label: impl Into<String>, accelerator: Option<&str>, role: Role) -> Self {
        Self {
            label: label.into(),
            accelerator: accelerator.map(str::to_string),
            role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Submenu {
    pub label: String,
    pub role: Option<Role>,
    pub items: Vec<MenuNode>,
}

impl Submenu {
    pub fn new(label: impl Into<String>, items: Vec<MenuNode>) -> Self {
        Self {
            label: label.into(),
            role: None,
            items,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(MenuNode::label).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MenuNode {
    Separator,
    Action(ActionItem),
    Role(RoleItem),
    Submenu(Submenu),
}

impl MenuNode {
    pub fn action(label: &str, accelerator: Option<&str>, command: Command) -> Self {
        MenuNode::Action(ActionItem::builtin(label, accelerator, command))
    }

    pub fn role(label: &str, accelerator: Option<&str>, role: Role) -> Self {
        MenuNode::Role(RoleItem::new(label, accelerator, role))
    }

    /// Separators have no label and yield `""`.
    pub fn label(&self) -> &str {
        match self {
            MenuNode::Separator => "",
            MenuNode::Action(item) => &item.label,
            MenuNode::Role(item) => &item.label,
            MenuNode::Submenu(sub) => &sub.label,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, MenuNode::Separator)
    }
}

/// Ordered top-level sections, rendered left to right.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct MenuBar {
    pub sections: Vec<Submenu>,
}

impl MenuBar {
    pub fn labels(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn section(&self, label: &str) -> Option<&Submenu> {
        self.sections.iter().find(|s| s.label == label)
    }

    /// First action item carrying `id`, searched depth-first.
    pub fn find_action(&self, id: CommandId) -> Option<&ActionItem> {
        fn walk(items: &[MenuNode], id: CommandId) -> Option<&ActionItem> {
            items.iter().find_map(|node| match node {
                MenuNode::Action(item) if item.id == id => Some(item),
                MenuNode::Submenu(sub) => walk(&sub.items, id),
                _ => None,
            })
        }
        self.sections.iter().find_map(|s| walk(&s.items, id))
    }

    /// Whether any role item (not a section role) names `role`.
    pub fn contains_role(&self, role: Role) -> bool {
        fn walk(items: &[MenuNode], role: Role) -> bool {
            items.iter().any(|node| match node {
                MenuNode::Role(item) => item.role == role,
                MenuNode::Submenu(sub) => walk(&sub.items, role),
                _ => false,
            })
        }
        self.sections.iter().any(|s| walk(&s.items, role))
    }

    /// Resolves `["Section", "Item", ...]` by label.
    pub fn find_by_path(&self, path: &[&str]) -> Option<&MenuNode> {
        let (first, rest) = path.split_first()?;
        let mut items = &self.section(first)?.items;
        let mut node = None;
        for label in rest {
            let found = items.iter().find(|n| !n.is_separator() && n.label() == *label)?;
            if let MenuNode::Submenu(sub) = found {
                items = &sub.items;
            }
            node = Some(found);
        }
        node
    }
}

/// Position of the Preferences item, handed out by the builder so the
/// account-switching feature can wire it without searching the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferencesSlot {
    section: usize,
    item: usize,
}

impl PreferencesSlot {
    pub(crate) fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

#[derive(Debug, Clone)]
pub struct BuiltMenu {
    pub bar: MenuBar,
    pub preferences: Option<PreferencesSlot>,
}

impl BuiltMenu {
    /// Wires the Preferences item. Returns `false` when this platform's menu has none.
    pub fn attach_preferences(
        &mut self,
        action: impl Fn(&ActionItem, Option<&dyn Window>) + 'static,
    ) -> bool {
        match self.preferences_item_mut() {
            Some(item) => {
                item.action = Some(Action::Custom(CustomAction::new(action)));
                true
            }
            None => false,
        }
    }

    pub fn preferences_item(&self) -> Option<&ActionItem> {
        let slot = self.preferences?;
        match self.bar.sections.get(slot.section)?.items.get(slot.item)? {
            MenuNode::Action(item) => Some(item),
            _ => None,
        }
    }

    fn preferences_item_mut(&mut self) -> Option<&mut ActionItem> {
        let slot = self.preferences?;
        match self.bar.sections.get_mut(slot.section)?.items.get_mut(slot.item)? {
            MenuNode::Action(item) => Some(item),
            _ => None,
        }
    }
}
