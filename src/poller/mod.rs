//! Status polling.
//!
//! The poller fetches the status report once at startup and then on a fixed
//! interval, handing every outcome to the [`Dashboard`]. Fetches run as
//! spawned tasks and report back over a channel, so a slow request never
//! blocks the loop; overlapping polls are ordered by [`PollSequence`].

mod config;
mod error;
mod sequence;

pub use config::*;
pub use error::*;
pub use sequence::PollSequence;

use crate::dashboard::Dashboard;
use crate::render::{ChartBackend, Surface};
use crate::status::StatusReport;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Shortest interval the poll loop accepts.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Anything that can produce a status report.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<StatusReport, FetchError>;
}

/// HTTP client for the status endpoint.
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl StatusClient {
    /// Create a client with its own connection pool.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Create a client around an existing HTTP client (for testing).
    pub fn with_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Classify reqwest error into FetchError.
    fn classify_error(e: reqwest::Error, timeout_seconds: u64) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(timeout_seconds)
        } else if e.is_decode() || e.is_body() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Connection(e.to_string())
        }
    }
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn fetch(&self) -> Result<StatusReport, FetchError> {
        let timeout = self.config.timeout_seconds;
        let response = self
            .client
            .get(&self.config.endpoint)
            .timeout(Duration::from_secs(timeout))
            .send()
            .await
            .map_err(|e| Self::classify_error(e, timeout))?;

        if !response.status().is_success() {
            return Err(FetchError::Http(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::classify_error(e, timeout))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Result of one poll, tagged with its sequence number.
#[derive(Debug)]
pub struct PollOutcome {
    pub seq: u64,
    pub result: Result<StatusReport, FetchError>,
}

/// Drives periodic fetches and feeds their outcomes to a dashboard.
pub struct Poller<Src> {
    source: Arc<Src>,
    interval: Duration,
    sequence: PollSequence,
}

impl<Src: StatusSource + 'static> Poller<Src> {
    pub fn new(source: Src, interval: Duration) -> Self {
        Self::from_arc(Arc::new(source), interval)
    }

    pub fn from_arc(source: Arc<Src>, interval: Duration) -> Self {
        Self {
            source,
            interval: interval.max(MIN_INTERVAL),
            sequence: PollSequence::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn sequence(&self) -> &PollSequence {
        &self.sequence
    }

    /// Issue a poll in the background; the outcome arrives on `tx`.
    pub fn spawn_fetch(&mut self, tx: mpsc::UnboundedSender<PollOutcome>) -> u64 {
        let seq = self.sequence.issue();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let start = Instant::now();
            let result = source.fetch().await;
            tracing::debug!(
                seq,
                ok = result.is_ok(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Status fetch finished"
            );
            // Receiver only goes away on shutdown
            let _ = tx.send(PollOutcome { seq, result });
        });
        seq
    }

    /// Apply an outcome unless a newer one has already been applied.
    ///
    /// Returns whether the dashboard changed.
    pub fn receive<S, C>(&mut self, outcome: PollOutcome, dashboard: &mut Dashboard<S, C>) -> bool
    where
        S: Surface,
        C: ChartBackend,
    {
        if !self.sequence.accept(outcome.seq) {
            tracing::debug!(
                seq = outcome.seq,
                last_applied = ?self.sequence.last_applied(),
                "Discarding stale poll outcome"
            );
            return false;
        }
        dashboard.apply(outcome.result);
        true
    }

    /// Fetch once and apply the result immediately.
    pub async fn poll_once<S, C>(&mut self, dashboard: &mut Dashboard<S, C>) -> bool
    where
        S: Surface,
        C: ChartBackend,
    {
        let seq = self.sequence.issue();
        let result = self.source.fetch().await;
        self.receive(PollOutcome { seq, result }, dashboard)
    }

    /// Run the poll loop until `cancel_token` fires.
    ///
    /// The first poll is issued immediately. `on_update` runs after every
    /// applied outcome, successful or not.
    pub async fn run<S, C, F>(
        &mut self,
        dashboard: &mut Dashboard<S, C>,
        cancel_token: CancellationToken,
        mut on_update: F,
    ) where
        S: Surface,
        C: ChartBackend,
        F: FnMut(&Dashboard<S, C>),
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "Status poller started"
        );

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    tracing::info!("Status poller shutting down");
                    break;
                }
                _ = interval.tick() => {
                    let seq = self.spawn_fetch(tx.clone());
                    if self.sequence.in_flight() > 1 {
                        tracing::debug!(
                            seq,
                            in_flight = self.sequence.in_flight(),
                            "Previous poll still in flight"
                        );
                    }
                }
                Some(outcome) = rx.recv() => {
                    if self.receive(outcome, dashboard) {
                        on_update(dashboard);
                    }
                }
            }
        }
    }
}
