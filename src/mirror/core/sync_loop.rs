use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::mirror::api::{WatchChange, WatchQuery, WATCH_PATH};
use crate::mirror::session::{ChangeReport, SyncSession};
use crate::types::MirrorError;

use super::http::{ApiRequest, Transport};

pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Long-poll timeout the server applies when none is requested, and its cap.
const SERVER_WATCH_TIMEOUT_SECS: u64 = 600;
const MAX_WATCH_TIMEOUT_SECS: u64 = 1800;
/// Extra wait on top of the server's timeout before a poll is given up.
const WATCH_GRACE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Polling,
    Applying,
    Backoff,
}

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Applied(ChangeReport),
    /// The long-poll ran out on the way (502); poll again right away.
    Timeout,
    /// The poll failed; the backoff delay has already elapsed.
    Backoff(String),
}

enum PollResult {
    Change(WatchChange),
    Timeout,
    Failed(MirrorError),
}

/// Long-poll subscription to `/watch`.
///
/// Exactly one poll is in flight at any time, and a reply is fully applied
/// before the next poll is issued.
pub struct SyncLoop {
    transport: Arc<dyn Transport>,
    session: SyncSession,
    backoff: Duration,
    watch_timeout: Option<u64>,
    state: LoopState,
    ticks: u64,
}

impl SyncLoop {
    pub fn new(transport: Arc<dyn Transport>, session: SyncSession) -> Self {
        Self {
            transport,
            session,
            backoff: DEFAULT_BACKOFF,
            watch_timeout: None,
            state: LoopState::Polling,
            ticks: 0,
        }
    }

    pub fn from_config(
        transport: Arc<dyn Transport>,
        session: SyncSession,
        config: &Config,
    ) -> Self {
        let mut sync = Self::new(transport, session).with_backoff(config.backoff());
        sync.watch_timeout = config.watch_timeout_secs;
        sync
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one POLLING → APPLYING | BACKOFF cycle and return to POLLING.
    pub async fn tick(&mut self) -> TickOutcome {
        self.state = LoopState::Polling;
        self.ticks += 1;

        let outcome = match self.poll().await {
            PollResult::Change(change) => {
                self.state = LoopState::Applying;
                let report = self.session.apply_change(change).await;
                TickOutcome::Applied(report)
            }
            PollResult::Timeout => {
                debug!("Watch timed out upstream, polling again");
                TickOutcome::Timeout
            }
            PollResult::Failed(err) => {
                self.state = LoopState::Backoff;
                warn!(
                    error = %err,
                    delay_ms = self.backoff.as_millis() as u64,
                    "Watch failed, backing off"
                );
                tokio::time::sleep(self.backoff).await;
                TickOutcome::Backoff(err.to_string())
            }
        };

        self.state = LoopState::Polling;
        outcome
    }

    /// How long a poll may stay open before the connection is presumed dead.
    pub fn watch_deadline(&self) -> Duration {
        let server_secs = self
            .watch_timeout
            .unwrap_or(SERVER_WATCH_TIMEOUT_SECS)
            .min(MAX_WATCH_TIMEOUT_SECS);
        Duration::from_secs(server_secs) + WATCH_GRACE
    }

    async fn poll(&self) -> PollResult {
        let deadline = self.watch_deadline();
        let request = ApiRequest::get(WATCH_PATH)
            .json()
            .query(&WatchQuery {
                timeout: self.watch_timeout,
            })
            .timeout(deadline);

        let response = match tokio::time::timeout(deadline, self.transport.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return PollResult::Failed(err),
            Err(_) => {
                return PollResult::Failed(MirrorError::Timeout {
                    path: WATCH_PATH.to_string(),
                    secs: deadline.as_secs(),
                })
            }
        };

        match response.status {
            StatusCode::OK => match response.json::<WatchChange>() {
                Ok(change) => PollResult::Change(change),
                Err(err) => PollResult::Failed(err),
            },
            StatusCode::BAD_GATEWAY => PollResult::Timeout,
            _ => PollResult::Failed(response.error(WATCH_PATH)),
        }
    }

    /// Poll until cancelled. Cancellation interrupts an in-flight poll or
    /// backoff delay, but never a change that is being applied.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("Start watching for drive changes");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                outcome = self.tick() => {
                    if let TickOutcome::Applied(report) = outcome {
                        debug!(report = ?report, "Tick applied");
                    }
                }
            }
        }
        info!(ticks = self.ticks, "Stopped watching for drive changes");
    }

    pub fn spawn(self) -> SyncHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(cancel.clone()));
        SyncHandle { cancel, task }
    }
}

/// Handle to a spawned [`SyncLoop`].
pub struct SyncHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SyncHandle {
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn stop(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            warn!(error = %err, "Sync loop task ended abnormally");
        }
    }
}
