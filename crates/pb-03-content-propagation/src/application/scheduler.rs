//! Re-offers content until enough peers hold it.

use std::sync::Arc;
use std::time::Duration;

use pb_02_content_codec::ContentKey;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{PropagationConfig, PropagationRecord, PropagationState};
use crate::ports::inbound::ContentPropagationApi;

/// Outcome of one scheduler run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetryReport {
    /// Offer rounds performed by this run.
    pub rounds: u32,
    pub satisfied: usize,
    /// Keys still below threshold when the run ended.
    pub unsatisfied: Vec<ContentKey>,
    pub cancelled: bool,
}

impl RetryReport {
    pub fn is_complete(&self) -> bool {
        self.unsatisfied.is_empty()
    }
}

/// Retry loop over a set of propagation records.
///
/// Each round offers every record that is `Pending` or `Retry`, then
/// evaluates it against the threshold. Rounds after the first are separated
/// by a fixed interval. The loop ends when every record is `Satisfied` or
/// when the shutdown channel flips to `true`.
pub struct RetryScheduler<P> {
    propagator: Arc<P>,
    threshold: u64,
    interval: Duration,
}

impl<P> Clone for RetryScheduler<P> {
    fn clone(&self) -> Self {
        Self {
            propagator: Arc::clone(&self.propagator),
            threshold: self.threshold,
            interval: self.interval,
        }
    }
}

impl<P: ContentPropagationApi + 'static> RetryScheduler<P> {
    pub fn new(propagator: Arc<P>, config: &PropagationConfig) -> Self {
        Self {
            propagator,
            threshold: config.retry_threshold,
            interval: config.retry_interval,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Drive `records` until all are satisfied or shutdown is requested.
    pub async fn run(
        &self,
        mut records: Vec<PropagationRecord>,
        mut shutdown: watch::Receiver<bool>,
    ) -> RetryReport {
        let mut rounds = 0u32;

        loop {
            if records.iter().all(PropagationRecord::is_satisfied) {
                return self.report(&records, rounds, false);
            }

            // Records that were already offered wait one interval first.
            let has_pending = records
                .iter()
                .any(|r| r.state == PropagationState::Pending);
            if !has_pending {
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {}
                    _ = shutdown_requested(&mut shutdown) => {
                        return self.report(&records, rounds, true);
                    }
                }
            }

            rounds += 1;
            for index in 0..records.len() {
                if !records[index].needs_push() {
                    continue;
                }
                if *shutdown.borrow() {
                    return self.report(&records, rounds, true);
                }

                let result = self.propagator.push(&records[index].item).await;
                let record = &mut records[index];
                record.record_push(result);
                let peers = record.last_result.max_peers();
                match record.evaluate(self.threshold) {
                    PropagationState::Satisfied => debug!(
                        content_key = %record.item.key,
                        peers_reached = peers,
                        rounds = record.rounds,
                        "Content sufficiently propagated"
                    ),
                    _ => info!(
                        content_key = %record.item.key,
                        peers_reached = peers,
                        threshold = self.threshold,
                        "Content under-propagated, will retry"
                    ),
                }
            }
        }
    }

    /// Run in the background.
    pub fn spawn(
        &self,
        records: Vec<PropagationRecord>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<RetryReport> {
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.run(records, shutdown).await })
    }

    fn report(&self, records: &[PropagationRecord], rounds: u32, cancelled: bool) -> RetryReport {
        let unsatisfied: Vec<ContentKey> = records
            .iter()
            .filter(|r| !r.is_satisfied())
            .map(|r| r.item.key)
            .collect();
        if cancelled && !unsatisfied.is_empty() {
            warn!(
                remaining = unsatisfied.len(),
                "Process exited before pushing out all content"
            );
        }
        RetryReport {
            rounds,
            satisfied: records.len() - unsatisfied.len(),
            unsatisfied,
            cancelled,
        }
    }
}

/// Resolves once shutdown is signalled. A dropped sender never resolves.
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
