//! Chat commands and settings menus.

pub mod commands;
pub mod handlers;
pub mod keyboards;
pub mod poller;

pub use commands::{CallbackAction, Command, SettingsMenu};
pub use handlers::BotHandler;
pub use poller::UpdatePoller;
