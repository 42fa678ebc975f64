use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use scheduler::DataFeed;

/// Replays scripted responses; the last one repeats once the script runs out.
#[derive(Clone)]
pub struct MockFeed {
    name: String,
    script: Arc<Mutex<VecDeque<Result<Value, String>>>>,
    last: Arc<Mutex<Option<Result<Value, String>>>>,
    pub fetches: Arc<AtomicUsize>,
}

impl MockFeed {
    pub fn new(name: &str, script: Vec<Result<Value, String>>) -> Self {
        Self {
            name: name.to_string(),
            script: Arc::new(Mutex::new(script.into())),
            last: Arc::new(Mutex::new(None)),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataFeed for MockFeed {
    fn identity(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _params: &HashMap<String, String>) -> anyhow::Result<Value> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().await.pop_front();
        let mut last = self.last.lock().await;
        if let Some(r) = next {
            *last = Some(r);
        }

        match last.clone() {
            Some(Ok(v)) => Ok(v),
            Some(Err(msg)) => Err(anyhow::anyhow!(msg)),
            None => Err(anyhow::anyhow!("empty script")),
        }
    }
}
