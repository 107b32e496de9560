//! Telegram Bot API transport (long polling + sendMessage)

mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{
    CallbackQuery, Chat, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update, User,
};
