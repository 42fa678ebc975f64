use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use market::Event;
use scheduler::Notifier;

/// Records every delivered batch.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub batches: Arc<Mutex<Vec<Vec<Event>>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn batches(&self) -> Vec<Vec<Event>> {
        self.batches.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, events: &[Event]) -> anyhow::Result<()> {
        self.batches.lock().await.push(events.to_vec());
        Ok(())
    }
}

/// Always fails.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    fn name(&self) -> &str {
        "failing"
    }

    async fn deliver(&self, _events: &[Event]) -> anyhow::Result<()> {
        anyhow::bail!("smtp server unreachable")
    }
}
