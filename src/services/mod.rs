//! External collaborators: exchange market data and the chat transport.

pub mod bybit;
pub mod market_data;
pub mod telegram;

pub use bybit::BybitClient;
pub use market_data::MarketDataProvider;
pub use telegram::TelegramClient;
