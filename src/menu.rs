//! Application menu: model, builder, handlers and native renderers.

pub mod accelerator;
pub mod builder;
pub mod commands;
pub mod dispatch;
pub mod handlers;
pub mod model;
pub mod native;

pub use builder::build;
pub use commands::{Command, CommandId};
pub use dispatch::Dispatcher;
pub use model::{
    Action, ActionItem, BuiltMenu, MenuBar, MenuNode, PreferencesSlot, Role, RoleItem, Submenu,
};
