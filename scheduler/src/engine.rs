//! The polling engine.
//!
//! Each scheduled tracker gets its own task which, on every tick:
//!   1. Fetches a raw payload from its data feed.
//!   2. Polls the tracker (adapter → history → pulses → ledger).
//!   3. Hands any resulting events to every notifier.
//!
//! The task owns its tracker, so polls of one tracker never overlap. A tick that
//! comes due while a poll is still running is skipped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use common::logger::{TraceId, poll_span, root_span};
use futures::future::join_all;
use market::{Event, Tracker};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{Instrument, debug, info, warn};

use crate::feed::DataFeed;
use crate::notify::Notifier;
use crate::types::ScheduleError;

pub type Notifiers = Arc<[Arc<dyn Notifier>]>;

/// A tracker bound to the feed it polls and how often.
pub struct ScheduledTracker {
    tracker: Tracker,
    feed: Arc<dyn DataFeed>,
    params: HashMap<String, String>,
    every: Duration,
}

impl ScheduledTracker {
    pub fn new(
        tracker: Tracker,
        feed: Arc<dyn DataFeed>,
        params: HashMap<String, String>,
        every: Duration,
    ) -> Result<Self, ScheduleError> {
        if every.is_zero() {
            return Err(ScheduleError::InvalidInterval(format!("{every:?}")));
        }

        Ok(Self {
            tracker,
            feed,
            params,
            every,
        })
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn interval(&self) -> Duration {
        self.every
    }

    /// One poll: fetch, evaluate, deliver. Returns the events produced.
    ///
    /// A fetch failure becomes a single error event.
    pub async fn run_once(&mut self, notifiers: &[Arc<dyn Notifier>]) -> Vec<Event> {
        let trace_id = TraceId::default();
        let span = poll_span(self.tracker.symbol(), self.feed.identity(), &trace_id);

        async {
            debug!("poll started");

            let events = match self.feed.fetch(&self.params).await {
                Ok(payload) => self.tracker.poll(&payload),
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "fetch failed");
                    vec![self.tracker.error_event(&format!("fetch failed: {e:#}"))]
                }
            };

            if !events.is_empty() {
                deliver_all(notifiers, &events).await;
            }

            debug!(events = events.len(), "poll finished");
            events
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for ScheduledTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTracker")
            .field("tracker", &self.tracker)
            .field("feed", &self.feed.identity())
            .field("params", &self.params)
            .field("every", &self.every)
            .finish()
    }
}

/// Deliver `events` to every notifier. A failing notifier is logged and does
/// not affect the others.
pub async fn deliver_all(notifiers: &[Arc<dyn Notifier>], events: &[Event]) {
    let results = join_all(
        notifiers
            .iter()
            .map(|n| async move { (n.name(), n.deliver(events).await) }),
    )
    .await;

    for (name, res) in results {
        if let Err(e) = res {
            warn!(notifier = name, error = %format!("{e:#}"), "delivery failed");
        }
    }
}

/// A set of scheduled trackers sharing the same notifiers.
#[derive(Default)]
pub struct Bot {
    trackers: Vec<ScheduledTracker>,
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl Bot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tracker(&mut self, tracker: ScheduledTracker) {
        self.trackers.push(tracker);
    }

    pub fn add_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn trackers(&self) -> &[ScheduledTracker] {
        &self.trackers
    }

    pub fn notifier_names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Start one task per tracker. Must be called inside a tokio runtime.
    pub fn spawn(self) -> BotHandle {
        let trace_id = TraceId::default();
        let root = root_span(&trace_id);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let notifiers: Notifiers = self.notifiers.into();

        root.in_scope(|| {
            info!(
                trackers = self.trackers.len(),
                notifiers = notifiers.len(),
                "bot started"
            )
        });

        let tasks = self
            .trackers
            .into_iter()
            .map(|st| {
                tokio::spawn(
                    run_tracker_loop(st, Arc::clone(&notifiers), shutdown_rx.clone())
                        .instrument(root.clone()),
                )
            })
            .collect();

        BotHandle {
            trace_id,
            shutdown: shutdown_tx,
            tasks,
        }
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("trackers", &self.trackers)
            .field("notifiers", &self.notifier_names())
            .finish()
    }
}

/// Running bot. Dropping the handle also stops the tracker tasks.
pub struct BotHandle {
    trace_id: TraceId,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<ScheduledTracker>>,
}

impl BotHandle {
    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Signal every tracker task to stop after its current poll and wait for
    /// them. Returns the trackers with their final state.
    pub async fn shutdown(self) -> Vec<ScheduledTracker> {
        if self.shutdown.send(true).is_err() {
            debug!("tracker tasks already stopped");
        }

        let mut trackers = Vec::with_capacity(self.tasks.len());
        for res in join_all(self.tasks).await {
            match res {
                Ok(st) => trackers.push(st),
                Err(e) => warn!(error = %e, "tracker task ended abnormally"),
            }
        }

        info!(trace_id = %self.trace_id, trackers = trackers.len(), "bot stopped");
        trackers
    }
}

async fn run_tracker_loop(
    mut st: ScheduledTracker,
    notifiers: Notifiers,
    mut shutdown: watch::Receiver<bool>,
) -> ScheduledTracker {
    let mut ticker = interval(st.every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        symbol = %st.tracker.symbol(),
        feed = %st.feed.identity(),
        every_secs = st.every.as_secs(),
        "tracker loop started"
    );

    loop {
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }

            _ = ticker.tick() => {
                let started = Instant::now();
                st.run_once(&notifiers).await;

                let took = started.elapsed();
                if took > st.every {
                    warn!(
                        symbol = %st.tracker.symbol(),
                        took_ms = took.as_millis() as u64,
                        every_ms = st.every.as_millis() as u64,
                        "poll overran its interval, skipping missed ticks"
                    );
                }
            }
        }
    }

    info!(symbol = %st.tracker.symbol(), "tracker loop stopped");
    st
}
