mod bot;
mod config;

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use clap::Parser;
use common::logger::{LogFormat, init_logger};
use market::AdapterRegistry;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{error, info, warn};

use bot::build_bot;
use config::BotConfig;

#[derive(Debug, Parser)]
#[clap(name = "ticker-bot", version)]
pub struct Cli {
    /// Bot configuration file (JSON)
    #[clap(long, short, default_value = "ticker-bot.json")]
    pub config: PathBuf,

    /// Emit logs as JSON lines
    #[clap(long)]
    pub json_logs: bool,

    /// Load and validate the configuration, then exit
    #[clap(long)]
    pub check: bool,
}

impl Cli {
    fn log_format(&self) -> LogFormat {
        if self.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger("ticker-bot", cli.log_format());

    let registry = AdapterRegistry::with_builtin();

    if cli.check {
        let cfg = BotConfig::load(&cli.config)?;
        build_bot(&cfg, &registry)?;
        info!(config = %cli.config.display(), "configuration is valid");
        return Ok(());
    }

    run(&cli.config, &registry).await
}

/// Run the bot until Ctrl-C, rebuilding it whenever the config file changes.
///
/// A reload that fails to load or build keeps the running bot.
async fn run(path: &Path, registry: &AdapterRegistry) -> Result<()> {
    let mut cfg = BotConfig::load(path)?;
    let mut mtime = modified(path).await?;
    let mut handle = build_bot(&cfg, registry)?.spawn();
    let mut check = reload_timer(cfg.sleep_period_secs).await;

    info!(config = %path.display(), trace_id = %handle.trace_id(), "ticker bot running");

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.context("listen for ctrl-c")?;
                info!("shutdown signal received");
                break;
            }

            _ = check.tick() => {
                let current = match modified(path).await {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(error = %format!("{e:#}"), "config check failed");
                        continue;
                    }
                };
                if current == mtime {
                    continue;
                }
                mtime = current;

                let rebuilt = BotConfig::load(path)
                    .and_then(|new_cfg| build_bot(&new_cfg, registry).map(|bot| (new_cfg, bot)));

                match rebuilt {
                    Ok((new_cfg, bot)) => {
                        handle.shutdown().await;
                        handle = bot.spawn();

                        if new_cfg.sleep_period_secs != cfg.sleep_period_secs {
                            check = reload_timer(new_cfg.sleep_period_secs).await;
                        }
                        cfg = new_cfg;

                        info!(trace_id = %handle.trace_id(), "configuration reloaded");
                    }
                    Err(e) => {
                        error!(error = %format!("{e:#}"), "reload failed, keeping current configuration");
                    }
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

async fn modified(path: &Path) -> Result<SystemTime> {
    tokio::fs::metadata(path)
        .await
        .and_then(|m| m.modified())
        .with_context(|| format!("stat {}", path.display()))
}

/// Timer for config-change checks. The immediate first tick is consumed.
async fn reload_timer(secs: u64) -> Interval {
    let mut t = interval(Duration::from_secs(secs.max(1)));
    t.set_missed_tick_behavior(MissedTickBehavior::Skip);
    t.tick().await;
    t
}
