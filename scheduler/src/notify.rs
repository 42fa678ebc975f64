//! Delivery of events produced by trackers.
//!
//! Notifiers are only called with a non-empty batch.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use market::Event;
use tokio::sync::mpsc;
use tracing::info;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, events: &[Event]) -> Result<()>;
}

/// All short texts joined with `" || "`.
pub fn short_messages(events: &[Event]) -> String {
    events
        .iter()
        .map(|e| e.short_text.as_str())
        .collect::<Vec<_>>()
        .join(" || ")
}

/// Banner-framed list of long texts.
pub fn long_messages(events: &[Event]) -> String {
    const SEP: &str = "\n\t- ";
    let rule = "_".repeat(50);
    let body = events
        .iter()
        .map(|e| e.long_text.as_str())
        .collect::<Vec<_>>()
        .join(SEP);

    format!(
        "{rule}\n{} Event(s) signaled:{SEP}{body}\n{rule}\n\n",
        events.len()
    )
}

/// Prints to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, events: &[Event]) -> Result<()> {
        println!("Short message--> {}", short_messages(events));
        println!("Long message-->\n{}", long_messages(events));
        Ok(())
    }
}

/// One structured tracing event per delivered event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, events: &[Event]) -> Result<()> {
        for e in events {
            info!(
                target: "ticker_events",
                tag = %e.tag,
                symbol = %e.symbol,
                text = %e.short_text,
                "event signaled"
            );
        }
        Ok(())
    }
}

/// Forwards events into an mpsc channel (embedding and tests).
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Event>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    fn name(&self) -> &str {
        "channel"
    }

    async fn deliver(&self, events: &[Event]) -> Result<()> {
        for e in events {
            self.tx
                .send(e.clone())
                .await
                .map_err(|_| anyhow!("event receiver dropped"))?;
        }
        Ok(())
    }
}
