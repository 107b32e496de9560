//! Inline keyboards

use crate::bot::commands::SettingsMenu;
use crate::services::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

const OPTIONS_PER_ROW: usize = 3;

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![
                InlineKeyboardButton::new("✅ Subscribe", "subscribe"),
                InlineKeyboardButton::new("❌ Unsubscribe", "unsubscribe"),
            ],
            vec![
                InlineKeyboardButton::new("📊 Subscription status", "status"),
                InlineKeyboardButton::new("⚙️ Settings", "settings"),
            ],
        ],
    }
}

pub fn settings_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![
                InlineKeyboardButton::new("📐 Timeframe", "menu_tf"),
                InlineKeyboardButton::new("🕯 Candles", "menu_limit"),
            ],
            vec![
                InlineKeyboardButton::new("📈 RSI period", "menu_rsi"),
                InlineKeyboardButton::new("⬆️ Upper RSI", "menu_ob"),
                InlineKeyboardButton::new("⬇️ Lower RSI", "menu_os"),
            ],
            vec![InlineKeyboardButton::new("📋 Main menu", "main_menu")],
        ],
    }
}

/// Value picker for a settings menu, followed by a back button
pub fn options(menu: SettingsMenu) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = menu
        .options()
        .into_iter()
        .map(|(label, data)| InlineKeyboardButton::new(label, data))
        .collect();

    let mut rows: Vec<Vec<InlineKeyboardButton>> = buttons
        .chunks(OPTIONS_PER_ROW)
        .map(|chunk| chunk.to_vec())
        .collect();
    rows.push(vec![InlineKeyboardButton::new("◀️ Back", "settings")]);

    InlineKeyboardMarkup {
        inline_keyboard: rows,
    }
}

pub fn back_to_main() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![InlineKeyboardButton::new("📋 Main menu", "main_menu")]],
    }
}
