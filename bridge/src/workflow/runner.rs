use flarmcore::flarm_interface::to_hex;
use flarmcore::processing::{EntryOutcome, TrafficProcessor};
use flarmcore::telemetry::{LogManager, Metrics, MetricsRecorder};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::source::SnapshotSource;
use crate::transport::Transport;
use crate::workflow::config::BridgeConfig;

/// State that lives for the whole run.
#[derive(Debug, Clone)]
pub struct CycleState {
    pub target_cn: String,
    pub target_hex: String,
    pub cycle_period: Duration,
    pub ownship_backoff: Duration,
    pub cycle: u64,
    pub consecutive_unavailable: u32,
    pub consecutive_missing: u32,
}

impl CycleState {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            target_cn: config.target_cn.clone(),
            target_hex: to_hex(&config.target_cn),
            cycle_period: config.cycle_period(),
            ownship_backoff: config.ownship_backoff(),
            cycle: 0,
            consecutive_unavailable: 0,
            consecutive_missing: 0,
        }
    }
}

/// Per-cycle tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub entries: usize,
    pub sent: usize,
    pub suppressed: usize,
    pub skipped: usize,
    pub send_failures: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Broadcast(CycleSummary),
    SnapshotUnavailable,
    OwnshipMissing,
}

/// Poll, locate ownship, broadcast every aircraft, then sleep out the period.
pub struct TrafficCycle<S, T> {
    source: S,
    transport: T,
    processor: TrafficProcessor,
    state: CycleState,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl<S: SnapshotSource, T: Transport> TrafficCycle<S, T> {
    pub fn new(config: &BridgeConfig, source: S, transport: T) -> Self {
        Self {
            source,
            transport,
            processor: TrafficProcessor::new(config.processing),
            state: CycleState::from_config(config),
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("cycle"),
        }
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    #[cfg(test)]
    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }

    /// Runs exactly one poll/compute/broadcast pass.
    pub async fn tick(&mut self) -> CycleOutcome {
        self.state.cycle += 1;

        let snapshot = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.state.consecutive_unavailable += 1;
                self.metrics.record_unavailable();
                self.logger.warn(&format!(
                    "snapshot from {} unavailable (attempt {}): {}; retrying in {:?}",
                    self.source.describe(),
                    self.state.consecutive_unavailable,
                    err,
                    self.source.backoff()
                ));
                return CycleOutcome::SnapshotUnavailable;
            }
        };
        self.state.consecutive_unavailable = 0;

        let ownship = TrafficProcessor::locate_ownship(&snapshot, &self.state.target_cn)
            .ok_or_else(|| "not in snapshot".to_string())
            .and_then(|entry| self.processor.position(entry).map_err(|e| e.to_string()));
        let ownship = match ownship {
            Ok(position) => position,
            Err(reason) => {
                self.state.consecutive_missing += 1;
                self.metrics.record_ownship_missing();
                self.logger.warn(&format!(
                    "cannot find ownship {} ({}), waiting {:?}",
                    self.state.target_cn, reason, self.state.ownship_backoff
                ));
                return CycleOutcome::OwnshipMissing;
            }
        };
        self.state.consecutive_missing = 0;

        let mut summary = CycleSummary {
            entries: snapshot.len(),
            ..Default::default()
        };

        for entry in &snapshot {
            match self.processor.process(&ownship, entry) {
                Ok(EntryOutcome::Sentence { sentence, .. }) => {
                    match self.transport.send(&sentence).await {
                        Ok(()) => {
                            summary.sent += 1;
                            self.metrics.record_sent();
                        }
                        Err(err) => {
                            summary.send_failures += 1;
                            self.metrics.record_send_failure();
                            self.logger.warn(&format!(
                                "send to {} failed: {}",
                                self.transport.describe(),
                                err
                            ));
                        }
                    }
                }
                Ok(EntryOutcome::Suppressed(_)) => {
                    summary.suppressed += 1;
                    self.metrics.record_suppressed();
                }
                Err(err) => {
                    summary.skipped += 1;
                    self.metrics.record_skipped();
                    self.logger
                        .warn(&format!("skipping {}: {}", entry.identifier(), err));
                }
            }
        }

        self.metrics.record_cycle();
        self.logger.detail(&format!(
            "cycle {}: {} aircraft, {} sent, {} suppressed, {} skipped, {} send failures",
            self.state.cycle,
            summary.entries,
            summary.sent,
            summary.suppressed,
            summary.skipped,
            summary.send_failures
        ));
        CycleOutcome::Broadcast(summary)
    }

    /// How long to wait before the next poll.
    pub fn wait_after(&self, outcome: &CycleOutcome, elapsed: Duration) -> Duration {
        match outcome {
            CycleOutcome::Broadcast(_) => self.state.cycle_period.saturating_sub(elapsed),
            CycleOutcome::SnapshotUnavailable => self.source.backoff(),
            CycleOutcome::OwnshipMissing => self.state.ownship_backoff,
        }
    }

    /// Cycles until `shutdown` resolves; any pending fetch or wait is abandoned.
    pub async fn run<F: Future<Output = ()>>(mut self, shutdown: F) -> Metrics {
        tokio::pin!(shutdown);

        loop {
            let started = Instant::now();
            let outcome = tokio::select! {
                outcome = self.tick() => outcome,
                _ = &mut shutdown => break,
            };

            let wait = self.wait_after(&outcome, started.elapsed());
            if wait.is_zero() {
                continue;
            }
            tokio::select! {
                _ = sleep(wait) => {}
                _ = &mut shutdown => break,
            }
        }

        let totals = self.metrics.snapshot();
        self.logger.record(&format!(
            "stopped after {} cycles: {} sent, {} suppressed, {} skipped, {} send failures",
            totals.cycles, totals.sent, totals.suppressed, totals.skipped, totals.send_failures
        ));
        totals
    }
}
