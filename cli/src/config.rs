use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use market::TrackerConfig;
use serde::Deserialize;

/// Bot configuration file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// How often (seconds) the config file is checked for changes.
    #[serde(default = "default_sleep_period")]
    pub sleep_period_secs: u64,

    #[serde(default)]
    pub feeds: Vec<FeedConfig>,

    #[serde(default)]
    pub notifiers: Vec<NotifierConfig>,

    #[serde(default)]
    pub trackers: Vec<ScheduleConfig>,
}

fn default_sleep_period() -> u64 {
    60
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    pub name: String,
    /// URL template; `{key}` is replaced from a tracker's `request_params`.
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Console,
    Log,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifierConfig {
    pub kind: NotifierKind,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Name of an entry in `feeds`.
    pub feed: String,

    #[serde(default)]
    pub request_params: HashMap<String, String>,

    /// e.g. `"30 seconds"`, `"5 minutes"`.
    pub interval: String,

    pub tracker: TrackerConfig,
}

impl BotConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("load config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw).context("parse bot config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks that do not need the adapter registry. Tracker-level validation
    /// happens when the bot is built.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.sleep_period_secs > 0, "sleep_period_secs must be positive");

        let mut names = std::collections::HashSet::new();
        for feed in &self.feeds {
            ensure!(names.insert(feed.name.as_str()), "duplicate feed name '{}'", feed.name);
        }

        Ok(())
    }
}
