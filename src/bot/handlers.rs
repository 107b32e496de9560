//! Reactions to commands and button presses
//!
//! Settings changes are applied to the config store right away. Timeframe
//! and candle-count changes also request a scan restart; the request never
//! blocks this task.

use crate::alerts::format::ParseMode;
use crate::bot::commands::{CallbackAction, Command};
use crate::bot::keyboards;
use crate::config::{AppConfig, ConfigStore, ConfigUpdate};
use crate::core::restart::RestartHandle;
use crate::error::Result;
use crate::services::telegram::{
    CallbackQuery, InlineKeyboardMarkup, Message, TelegramClient, Update,
};
use crate::subscribers::SubscriberStore;
use tracing::{debug, info, warn};

pub struct BotHandler {
    client: TelegramClient,
    config: ConfigStore,
    subscribers: SubscriberStore,
    restart: RestartHandle,
}

impl BotHandler {
    pub fn new(
        client: TelegramClient,
        config: ConfigStore,
        subscribers: SubscriberStore,
        restart: RestartHandle,
    ) -> Self {
        Self {
            client,
            config,
            subscribers,
            restart,
        }
    }

    pub async fn handle_update(&self, update: Update) -> Result<()> {
        if let Some(query) = update.callback_query {
            return self.handle_callback(&query).await;
        }
        if let Some(message) = update.message {
            return self.handle_message(&message).await;
        }
        Ok(())
    }

    async fn handle_message(&self, message: &Message) -> Result<()> {
        let chat_id = message.chat.id;
        let Some(command) = message.text.as_deref().and_then(Command::parse) else {
            return Ok(());
        };
        debug!(chat_id, command = ?command, "Received command");

        match command {
            Command::Start => self.show_main_menu(chat_id).await,
            Command::Settings => self.show_settings(chat_id).await,
            Command::Stop => {
                self.subscribers.unsubscribe(chat_id).await;
                self.reply(chat_id, "❌ You have unsubscribed from signals", None)
                    .await
            }
            Command::Status => {
                let status = if self.subscribers.contains(chat_id).await {
                    "✅ Subscribed"
                } else {
                    "❌ Not subscribed"
                };
                let text = format!("📊 *Subscription status*\n\n{}", status);
                self.reply_markdown(chat_id, &text, None).await
            }
            Command::Help => {
                let config = self.config.snapshot().await;
                self.reply_markdown(chat_id, &help_text(&config), None).await
            }
        }
    }

    async fn handle_callback(&self, query: &CallbackQuery) -> Result<()> {
        let chat_id = query.chat_id();
        let action = query.data.as_deref().and_then(CallbackAction::parse);
        debug!(chat_id, data = ?query.data, "Received callback");

        let result = match action {
            Some(action) => self.apply_action(chat_id, action).await,
            None => Ok(()),
        };

        // Stop the client-side spinner even if the reply failed
        if let Err(e) = self.client.answer_callback_query(&query.id).await {
            warn!(chat_id, error = %e, "Failed to answer callback query");
        }
        result
    }

    async fn apply_action(&self, chat_id: i64, action: CallbackAction) -> Result<()> {
        match action {
            CallbackAction::MainMenu => self.show_main_menu(chat_id).await,
            CallbackAction::Settings => self.show_settings(chat_id).await,
            CallbackAction::OpenMenu(menu) => {
                self.reply(chat_id, menu.title(), Some(&keyboards::options(menu)))
                    .await
            }
            CallbackAction::Subscribe => {
                let text = if self.subscribers.subscribe(chat_id).await {
                    "✅ You have subscribed to signals!"
                } else {
                    "⚠️ You are already subscribed to signals!"
                };
                self.reply_markdown(chat_id, text, Some(&keyboards::back_to_main()))
                    .await
            }
            CallbackAction::Unsubscribe => {
                self.subscribers.unsubscribe(chat_id).await;
                self.reply_markdown(
                    chat_id,
                    "❌ You have unsubscribed from signals. Press /start to come back",
                    None,
                )
                .await
            }
            CallbackAction::Status => {
                let text = if self.subscribers.contains(chat_id).await {
                    "✅ Status: *Active*\nYou receive all RSI signals."
                } else {
                    "❌ Status: *Inactive*\nSubscribe to receive signals."
                };
                self.reply_markdown(chat_id, text, Some(&keyboards::back_to_main()))
                    .await
            }
            CallbackAction::Apply(update) => {
                self.config.apply(&update).await;
                if update.requires_restart() {
                    let queued = self.restart.request();
                    info!(chat_id, queued, "Scan restart requested");
                }
                self.reply_markdown(
                    chat_id,
                    &update_reply(&update),
                    Some(&keyboards::back_to_main()),
                )
                .await
            }
        }
    }

    async fn show_main_menu(&self, chat_id: i64) -> Result<()> {
        self.reply_markdown(
            chat_id,
            "🤖 *RSI Signal Bot*\n\nChoose an action:",
            Some(&keyboards::main_menu()),
        )
        .await
    }

    async fn show_settings(&self, chat_id: i64) -> Result<()> {
        let config = self.config.snapshot().await;
        self.reply_markdown(chat_id, &settings_text(&config), Some(&keyboards::settings_menu()))
            .await
    }

    async fn reply(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.client.send_text(chat_id, text, None, keyboard).await
    }

    async fn reply_markdown(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.client
            .send_text(chat_id, text, Some(ParseMode::Markdown), keyboard)
            .await
    }
}

pub fn settings_text(config: &AppConfig) -> String {
    format!(
        "⚙️ *Current settings*\n\n\
         Timeframe: *{}* min\n\
         Candles: *{}*\n\
         RSI period: *{}*\n\
         Upper threshold (overbought): *{:.0}*\n\
         Lower threshold (oversold): *{:.0}*",
        config.timeframe, config.limit, config.rsi_period, config.overbought, config.oversold
    )
}

pub fn help_text(config: &AppConfig) -> String {
    format!(
        "🤖 *RSI Signal Bot*\n\n\
         *Commands:*\n\
         /start - Show the main menu\n\
         /settings - Settings (timeframe, RSI thresholds)\n\
         /status - Check subscription status\n\
         /stop - Unsubscribe from signals\n\
         /help - Show this help\n\n\
         *Current parameters:*\n\
         Timeframe: {} min, candles: {}, RSI period: {}\n\
         Signals: RSI >= {:.0} (SHORT) or RSI <= {:.0} (LONG)",
        config.timeframe,
        config.limit,
        config.rsi_period,
        config.overbought,
        config.oversold
    )
}

pub fn update_reply(update: &ConfigUpdate) -> String {
    match update {
        ConfigUpdate::Timeframe(tf) => format!("✅ Timeframe: {} min. Scan restarted.", tf),
        ConfigUpdate::Limit(limit) => format!("✅ Candles: {}. Scan restarted.", limit),
        ConfigUpdate::RsiPeriod(period) => format!("✅ RSI period: {}", period),
        ConfigUpdate::Overbought(value) => format!("✅ Upper RSI threshold: {:.0}", value),
        ConfigUpdate::Oversold(value) => format!("✅ Lower RSI threshold: {:.0}", value),
    }
}
