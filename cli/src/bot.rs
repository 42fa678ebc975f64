//! Assembling a `Bot` from a `BotConfig`.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use market::{AdapterRegistry, Tracker};
use scheduler::{
    Bot, ConsoleNotifier, DataFeed, HttpTickerFeed, LogNotifier, Notifier, ScheduleError,
    ScheduledTracker, parse_interval,
};
use tracing::{debug, info};

use crate::config::{BotConfig, NotifierKind};

pub fn build_bot(cfg: &BotConfig, registry: &AdapterRegistry) -> Result<Bot> {
    let mut feeds: HashMap<&str, Arc<HttpTickerFeed>> = HashMap::new();
    for f in &cfg.feeds {
        let feed = HttpTickerFeed::new(f.name.as_str(), f.url.as_str())
            .with_context(|| format!("feed '{}'", f.name))?;
        feeds.insert(f.name.as_str(), Arc::new(feed));
    }

    let mut bot = Bot::new();

    for n in cfg.notifiers.iter().filter(|n| n.active) {
        let notifier: Arc<dyn Notifier> = match n.kind {
            NotifierKind::Console => Arc::new(ConsoleNotifier),
            NotifierKind::Log => Arc::new(LogNotifier),
        };
        bot.add_notifier(notifier);
    }

    for (i, s) in cfg.trackers.iter().enumerate() {
        let ctx = || format!("tracker #{i} ({} on '{}')", s.tracker.symbol, s.feed);

        let feed = feeds
            .get(s.feed.as_str())
            .ok_or_else(|| ScheduleError::UnknownFeed(s.feed.clone()))
            .with_context(ctx)?;

        let identity = adapter_identity(feed, registry);
        let tracker = Tracker::new(s.tracker.clone(), identity, registry)
            .map_err(ScheduleError::from)
            .with_context(ctx)?;
        let every = parse_interval(&s.interval).with_context(ctx)?;

        debug!(
            symbol = %s.tracker.symbol,
            feed = %s.feed,
            every_secs = every.as_secs(),
            "tracker scheduled"
        );

        let feed: Arc<dyn DataFeed> = feed.clone();
        bot.add_tracker(
            ScheduledTracker::new(tracker, feed, s.request_params.clone(), every)
                .with_context(ctx)?,
        );
    }

    info!(
        trackers = bot.trackers().len(),
        notifiers = ?bot.notifier_names(),
        "bot assembled"
    );
    Ok(bot)
}

/// The feed's name when an adapter is registered under it, its URL otherwise.
fn adapter_identity(feed: &HttpTickerFeed, registry: &AdapterRegistry) -> String {
    if registry.resolve(feed.identity()).is_ok() {
        feed.identity().to_string()
    } else {
        feed.url_template().to_string()
    }
}
