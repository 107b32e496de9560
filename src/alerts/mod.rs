//! Alert rendering and subscriber fan-out.

pub mod dispatcher;
pub mod format;

pub use dispatcher::{AlertDispatcher, DispatchReport, MessageSender};
pub use format::{AlertFormatter, DefaultFormatter, ParseMode, RenderedMessage};
