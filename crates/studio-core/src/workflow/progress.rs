//! Simulated progress shown while a collaborator call is outstanding.
//!
//! A run owns two periodic tasks that share one cancellation token: one raises
//! the percentage toward [`PROGRESS_CEILING`] in proportion to elapsed time over
//! the estimate, the other rotates the status message. Dropping the
//! [`ProgressRun`] cancels both and publishes the idle state.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::step::LoadingKind;

/// Simulated progress never passes this value; only completion ends the run.
pub const PROGRESS_CEILING: u8 = 98;

/// What the loading overlay shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadingProgress {
    pub percent: u8,
    /// `None` when idle
    pub message: Option<&'static str>,
}

impl LoadingProgress {
    pub fn is_idle(&self) -> bool {
        self.message.is_none() && self.percent == 0
    }
}

/// `min(98, elapsed / estimate * 100)`, floored.
pub fn simulated_percent(elapsed: Duration, estimate: Duration) -> u8 {
    if estimate.is_zero() {
        return PROGRESS_CEILING;
    }
    let percent = elapsed.as_secs_f64() / estimate.as_secs_f64() * 100.0;
    percent.min(f64::from(PROGRESS_CEILING)) as u8
}

/// Publishes loading progress and starts runs.
pub struct ProgressSimulator {
    sender: Arc<watch::Sender<LoadingProgress>>,
    tick: Duration,
    rotate: Duration,
    shutdown: CancellationToken,
}

impl ProgressSimulator {
    pub fn new(tick: Duration, rotate: Duration) -> Self {
        let (sender, _) = watch::channel(LoadingProgress::default());
        Self {
            sender: Arc::new(sender),
            tick,
            rotate,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadingProgress> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> LoadingProgress {
        self.sender.borrow().clone()
    }

    /// Starts the two tasks for one loading phase. Must be called inside a
    /// tokio runtime.
    pub fn start(&self, kind: LoadingKind, estimate: Duration) -> ProgressRun {
        let token = self.shutdown.child_token();
        let messages = kind.messages();
        self.sender.send_replace(LoadingProgress {
            percent: 0,
            message: messages.first().copied(),
        });
        tracing::debug!(%kind, estimate_ms = estimate.as_millis() as u64, "Progress run started");

        let started = Instant::now();
        let percent_task = tokio::spawn(advance_percent(
            self.sender.clone(),
            token.clone(),
            self.tick,
            started,
            estimate,
        ));
        let message_task = tokio::spawn(rotate_messages(
            self.sender.clone(),
            token.clone(),
            self.rotate,
            messages,
        ));

        ProgressRun {
            token,
            sender: self.sender.clone(),
            tasks: vec![percent_task, message_task],
        }
    }

    /// Cancels any active run; used on controller teardown.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// One loading phase. Dropping it ends the phase.
pub struct ProgressRun {
    token: CancellationToken,
    sender: Arc<watch::Sender<LoadingProgress>>,
    tasks: Vec<JoinHandle<()>>,
}

impl ProgressRun {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ProgressRun {
    fn drop(&mut self) {
        self.token.cancel();
        for task in &self.tasks {
            task.abort();
        }
        // Tasks check the token under the channel lock, so nothing lands after this.
        self.sender.send_replace(LoadingProgress::default());
        tracing::debug!("Progress run finished");
    }
}

async fn advance_percent(
    sender: Arc<watch::Sender<LoadingProgress>>,
    token: CancellationToken,
    tick: Duration,
    started: Instant,
    estimate: Duration,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                let percent = simulated_percent(started.elapsed(), estimate);
                sender.send_if_modified(|progress| {
                    if token.is_cancelled() || percent <= progress.percent {
                        return false;
                    }
                    progress.percent = percent;
                    true
                });
            }
        }
    }
}

async fn rotate_messages(
    sender: Arc<watch::Sender<LoadingProgress>>,
    token: CancellationToken,
    period: Duration,
    messages: &'static [&'static str],
) {
    if messages.len() < 2 {
        return;
    }
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut index = 0;
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                index = (index + 1) % messages.len();
                sender.send_if_modified(|progress| {
                    if token.is_cancelled() {
                        return false;
                    }
                    progress.message = Some(messages[index]);
                    true
                });
            }
        }
    }
}
