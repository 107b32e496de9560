//! Per-kind message templates

use crate::models::signal::{SignalEvent, SignalKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
    Html,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
            ParseMode::Html => "HTML",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
}

impl RenderedMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: Some(ParseMode::Markdown),
        }
    }
}

/// Turns a signal event into the text subscribers receive
pub trait AlertFormatter: Send + Sync {
    fn render(&self, event: &SignalEvent) -> RenderedMessage;
}

/// Markdown layouts for SHORT and LONG; any other kind uses a plain template.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl AlertFormatter for DefaultFormatter {
    fn render(&self, event: &SignalEvent) -> RenderedMessage {
        let params = format!(
            "Timeframe: {} min, candles: {}",
            event.timeframe, event.limit
        );

        match &event.kind {
            SignalKind::Short => RenderedMessage::markdown(format!(
                "🔴 📉 *SHORT* - overbought\n\nSymbol: `{}`\nRSI: *{:.2}*\n{}",
                event.symbol, event.value, params
            )),
            SignalKind::Long => RenderedMessage::markdown(format!(
                "🟢 📈 *LONG* - oversold\n\nSymbol: `{}`\nRSI: *{:.2}*\n{}",
                event.symbol, event.value, params
            )),
            other => RenderedMessage::plain(format!(
                "🚨 {} SIGNAL\nSymbol: {}\nRSI: {:.2}\n{}",
                other, event.symbol, event.value, params
            )),
        }
    }
}
