//! # Bridge Orchestrator
//!
//! Runs one operating mode: follow the head, backfill a range, patch the
//! most recent blocks, or inject content files. Each block goes through the
//! [`BlockPipeline`]; whatever it offered that is still under-propagated is
//! handed to a background [`RetryScheduler`] task so the next block does
//! not wait on peers.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pb_03_content_propagation::{
    shutdown_requested, ContentPropagationApi, PropagationConfig, PropagationRecord, RetryReport,
    RetryScheduler,
};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

use super::pipeline::BlockPipeline;
use crate::adapters::load_content_files;
use crate::config::OrchestratorConfig;
use crate::domain::{BlockId, BridgeError, RunReport};
use crate::ports::inbound::BridgeApi;
use crate::ports::outbound::ChainSource;

/// Background retry tasks started during one run.
///
/// At most `limit` run at once. Scheduling past the limit waits for one to
/// finish, so a run whose content never reaches peers stops taking on new
/// blocks instead of growing without bound.
struct RetryTasks {
    set: JoinSet<RetryReport>,
    limit: usize,
}

impl RetryTasks {
    fn new(limit: usize) -> Self {
        Self {
            set: JoinSet::new(),
            limit: limit.max(1),
        }
    }

    async fn schedule<P: ContentPropagationApi + 'static>(
        &mut self,
        scheduler: &RetryScheduler<P>,
        records: Vec<PropagationRecord>,
        shutdown: watch::Receiver<bool>,
        report: &mut RunReport,
    ) {
        if records.iter().all(PropagationRecord::is_satisfied) {
            return;
        }
        self.reap_finished(report);
        if self.set.len() >= self.limit {
            warn!(
                running = self.set.len(),
                "Too much content waiting for peers, pausing until a retry task finishes"
            );
            if let Some(result) = self.set.join_next().await {
                Self::absorb(result, report);
            }
        }
        let scheduler = scheduler.clone();
        self.set
            .spawn(async move { scheduler.run(records, shutdown).await });
    }

    /// Collect tasks that already finished.
    fn reap_finished(&mut self, report: &mut RunReport) {
        while let Some(result) = self.set.try_join_next() {
            Self::absorb(result, report);
        }
    }

    /// Wait for every task; they end once satisfied or on shutdown.
    async fn finish(mut self, report: &mut RunReport) {
        if !self.set.is_empty() {
            info!(tasks = self.set.len(), "Waiting for content to reach enough peers");
        }
        while let Some(result) = self.set.join_next().await {
            Self::absorb(result, report);
        }
    }

    fn absorb(result: Result<RetryReport, JoinError>, report: &mut RunReport) {
        match result {
            Ok(retry) => report.absorb(retry),
            Err(e) => error!(error = %e, "Retry task failed"),
        }
    }
}

pub struct BridgeOrchestrator<C, P> {
    source: Arc<C>,
    pipeline: BlockPipeline<C, P>,
    scheduler: RetryScheduler<P>,
    head_poll_interval: Duration,
    max_retry_tasks: usize,
    shutdown: watch::Receiver<bool>,
}

impl<C, P> BridgeOrchestrator<C, P>
where
    C: ChainSource + 'static,
    P: ContentPropagationApi + 'static,
{
    pub fn new(
        source: Arc<C>,
        propagator: Arc<P>,
        config: &OrchestratorConfig,
        propagation: &PropagationConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let pipeline = BlockPipeline::new(
            Arc::clone(&source),
            Arc::clone(&propagator),
            config,
            propagation.retry_threshold,
        );
        Self {
            source,
            pipeline,
            scheduler: RetryScheduler::new(propagator, propagation),
            head_poll_interval: config.head_poll_interval(),
            max_retry_tasks: config.max_retry_tasks,
            shutdown,
        }
    }

    pub fn pipeline(&self) -> &BlockPipeline<C, P> {
        &self.pipeline
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleep one head-poll interval; `true` if shutdown arrived first.
    async fn pause(&self) -> bool {
        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            _ = tokio::time::sleep(self.head_poll_interval) => false,
            _ = shutdown_requested(&mut shutdown) => true,
        }
    }

    async fn process_and_schedule(&self, id: BlockId, report: &mut RunReport, retries: &mut RetryTasks) {
        let mut records = Vec::new();
        match self.pipeline.process(id, &mut records).await {
            Ok(number) => report.processed.push(number),
            Err(e) => {
                error!(block = %id, error = %e, "Block processing failed");
                report.record_failure(id, e.to_string());
            }
        }
        report.content_items += records.len();
        retries
            .schedule(&self.scheduler, records, self.shutdown.clone(), report)
            .await;
    }

    fn retry_tasks(&self) -> RetryTasks {
        RetryTasks::new(self.max_retry_tasks)
    }
}

#[async_trait]
impl<C, P> BridgeApi for BridgeOrchestrator<C, P>
where
    C: ChainSource + 'static,
    P: ContentPropagationApi + 'static,
{
    async fn follow_head(&self) -> RunReport {
        let mut report = RunReport::default();
        let mut retries = self.retry_tasks();

        'subscribe: while !self.is_shutdown() {
            let filter_id = match self.source.new_block_filter().await {
                Ok(id) => id,
                Err(e) => {
                    warn!(error = %e, "Could not subscribe to new blocks, re-attempting");
                    if self.pause().await {
                        break;
                    }
                    continue;
                }
            };
            info!(filter_id = %filter_id, "Watching for new block hashes");

            loop {
                let hashes = match self.source.filter_changes(&filter_id).await {
                    Ok(hashes) => hashes,
                    Err(BridgeError::SubscriptionDropped(reason)) => {
                        warn!(%reason, "Recreating filter to watch for latest headers");
                        continue 'subscribe;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failure to get latest block hashes, re-subscribing");
                        if self.pause().await {
                            break 'subscribe;
                        }
                        continue 'subscribe;
                    }
                };

                for hash in hashes {
                    if self.is_shutdown() {
                        break 'subscribe;
                    }
                    self.process_and_schedule(BlockId::Hash(hash), &mut report, &mut retries)
                        .await;
                }
                retries.reap_finished(&mut report);

                if self.pause().await {
                    break 'subscribe;
                }
            }
        }

        report.interrupted = true;
        retries.finish(&mut report).await;
        report
    }

    async fn backfill(&self, start: u64, end: u64) -> Result<RunReport, BridgeError> {
        if start > end {
            return Err(BridgeError::Configuration(format!(
                "backfill start {start} is after end {end}"
            )));
        }
        info!(start, end, "Backfilling blocks");

        let mut report = RunReport::default();
        let mut retries = self.retry_tasks();
        for number in start..=end {
            if self.is_shutdown() {
                warn!(next = number, end, "Backfill interrupted");
                report.interrupted = true;
                break;
            }
            self.process_and_schedule(BlockId::Number(number), &mut report, &mut retries)
                .await;
            retries.reap_finished(&mut report);
        }
        retries.finish(&mut report).await;

        info!(
            processed = report.processed.len(),
            failed = report.failed.len(),
            unsatisfied = report.unsatisfied.len(),
            "Backfill finished"
        );
        Ok(report)
    }

    async fn patch_recent(&self, count: u64) -> Result<RunReport, BridgeError> {
        let head = self.source.latest_block_number().await?;
        let start = head.saturating_sub(count);
        info!(head, count, "Patching recent blocks");
        self.backfill(start, head).await
    }

    async fn inject_files(&self, paths: &[PathBuf]) -> Result<RunReport, BridgeError> {
        let items = load_content_files(paths)?;
        info!(count = items.len(), "Injecting items of content");

        let mut report = RunReport::default();
        let mut records = Vec::with_capacity(items.len());
        for item in items {
            if self.is_shutdown() {
                report.interrupted = true;
                break;
            }
            records.push(self.pipeline.offer(item).await);
        }
        report.content_items = records.len();

        let mut retries = self.retry_tasks();
        retries
            .schedule(&self.scheduler, records, self.shutdown.clone(), &mut report)
            .await;
        retries.finish(&mut report).await;
        Ok(report)
    }
}
