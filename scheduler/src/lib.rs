pub mod engine;
pub mod feed;
pub mod notify;
pub mod types;

pub use engine::{Bot, BotHandle, ScheduledTracker};
pub use feed::{DataFeed, HttpTickerFeed};
pub use notify::{ChannelNotifier, ConsoleNotifier, LogNotifier, Notifier};
pub use types::{ScheduleError, parse_interval};
