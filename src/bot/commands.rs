//! Parsing of slash commands and inline-button callback data

use crate::config::ConfigUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Status,
    Help,
    Settings,
}

impl Command {
    /// Parse `/name` or `/name@botname`, ignoring any arguments
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "stop" => Some(Command::Stop),
            "status" => Some(Command::Status),
            "help" => Some(Command::Help),
            "settings" => Some(Command::Settings),
            _ => None,
        }
    }
}

/// Settings sub-menus offering a fixed set of values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsMenu {
    Timeframe,
    Limit,
    RsiPeriod,
    Overbought,
    Oversold,
}

impl SettingsMenu {
    pub fn title(self) -> &'static str {
        match self {
            SettingsMenu::Timeframe => "Choose timeframe (minutes):",
            SettingsMenu::Limit => "Number of candles used for RSI:",
            SettingsMenu::RsiPeriod => "RSI period:",
            SettingsMenu::Overbought => "Upper RSI threshold (overbought):",
            SettingsMenu::Oversold => "Lower RSI threshold (oversold):",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            SettingsMenu::Timeframe => "tf",
            SettingsMenu::Limit => "limit",
            SettingsMenu::RsiPeriod => "rsi",
            SettingsMenu::Overbought => "ob",
            SettingsMenu::Oversold => "os",
        }
    }

    fn values(self) -> &'static [&'static str] {
        match self {
            SettingsMenu::Timeframe => &["5", "15", "30", "60", "240"],
            SettingsMenu::Limit => &["50", "100", "200"],
            SettingsMenu::RsiPeriod => &["7", "14", "21"],
            SettingsMenu::Overbought => &["70", "75", "80", "85", "90", "95", "100"],
            SettingsMenu::Oversold => &["0", "15", "20", "25", "30"],
        }
    }

    /// (button label, callback data) pairs
    pub fn options(self) -> Vec<(String, String)> {
        self.values()
            .iter()
            .map(|v| (v.to_string(), format!("{}_{}", self.prefix(), v)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackAction {
    MainMenu,
    Settings,
    Subscribe,
    Unsubscribe,
    Status,
    OpenMenu(SettingsMenu),
    Apply(ConfigUpdate),
}

impl CallbackAction {
    /// Unknown data and invalid values yield `None`
    pub fn parse(data: &str) -> Option<Self> {
        let action = match data {
            "main_menu" => CallbackAction::MainMenu,
            "settings" => CallbackAction::Settings,
            "subscribe" => CallbackAction::Subscribe,
            "unsubscribe" => CallbackAction::Unsubscribe,
            "status" => CallbackAction::Status,
            "menu_tf" => CallbackAction::OpenMenu(SettingsMenu::Timeframe),
            "menu_limit" => CallbackAction::OpenMenu(SettingsMenu::Limit),
            "menu_rsi" => CallbackAction::OpenMenu(SettingsMenu::RsiPeriod),
            "menu_ob" => CallbackAction::OpenMenu(SettingsMenu::Overbought),
            "menu_os" => CallbackAction::OpenMenu(SettingsMenu::Oversold),
            _ => return parse_update(data).map(CallbackAction::Apply),
        };
        Some(action)
    }
}

fn parse_update(data: &str) -> Option<ConfigUpdate> {
    let (key, value) = data.split_once('_')?;
    match key {
        "tf" if is_interval(value) => Some(ConfigUpdate::Timeframe(value.to_string())),
        "limit" => positive(value).map(ConfigUpdate::Limit),
        "rsi" => positive(value).map(ConfigUpdate::RsiPeriod),
        "ob" => finite(value).map(ConfigUpdate::Overbought),
        "os" => finite(value).map(ConfigUpdate::Oversold),
        _ => None,
    }
}

fn is_interval(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

fn positive(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|v| *v > 0)
}

fn finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
