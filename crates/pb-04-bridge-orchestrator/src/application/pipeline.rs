//! # Block Pipeline
//!
//! One block, start to finish:
//!
//! ```text
//! fetch block ──→ header: encode, check hash ──→ offer header
//!             ──→ transactions: encode, check root
//!             ──→ uncles: fetch, encode, check uncles hash ──→ offer body
//!             ──→ receipts: poll, encode, check root ──→ offer receipts
//! ```
//!
//! A failed check stops the remaining steps. Content already offered for
//! the block stays in the caller's record list so it can still be retried.

use std::sync::Arc;

use bridge_telemetry::{log_block_event, log_content_event};
use pb_01_canonical_encoding::{CanonicalEncoder, CanonicalTransaction};
use pb_02_content_codec::ContentKeyCodec;
use pb_03_content_propagation::{ContentItem, ContentPropagationApi, PropagationRecord};
use shared_types::{BlockFields, Hash, ReceiptFields};
use tracing::{debug, info};

use crate::adapters::BadReceiptArchive;
use crate::config::{OrchestratorConfig, ReceiptConfig};
use crate::domain::{BlockId, BridgeError, ContentBuilder};
use crate::ports::outbound::ChainSource;

pub struct BlockPipeline<C, P> {
    source: Arc<C>,
    propagator: Arc<P>,
    builder: ContentBuilder,
    archive: BadReceiptArchive,
    receipts: ReceiptConfig,
    threshold: u64,
}

impl<C: ChainSource, P: ContentPropagationApi> BlockPipeline<C, P> {
    /// `threshold` is the peers count at which an offered item counts as
    /// propagated.
    pub fn new(source: Arc<C>, propagator: Arc<P>, config: &OrchestratorConfig, threshold: u64) -> Self {
        let builder = ContentBuilder::new(
            CanonicalEncoder::new(config.fork_schedule()),
            ContentKeyCodec::new(config.content_keys.chain_id),
        );
        Self {
            source,
            propagator,
            builder,
            archive: BadReceiptArchive::new(config.bad_receipt_dir.clone()),
            receipts: config.receipts.clone(),
            threshold,
        }
    }

    pub fn builder(&self) -> &ContentBuilder {
        &self.builder
    }

    /// Fetch and process one block; returns its number.
    pub async fn process(
        &self,
        id: BlockId,
        records: &mut Vec<PropagationRecord>,
    ) -> Result<u64, BridgeError> {
        let block = match id {
            BlockId::Hash(hash) => self.source.block_by_hash(hash).await?,
            BlockId::Number(number) => self.source.block_by_number(number).await?,
        }
        .ok_or_else(|| BridgeError::BlockNotFound(format!("block {id}")))?;

        self.process_block(&block, records).await?;
        Ok(block.block_number())
    }

    /// Offer header, body and receipts content of `block`.
    ///
    /// Every offered item is appended to `records`, including those offered
    /// before a later step failed.
    pub async fn process_block(
        &self,
        block: &BlockFields,
        records: &mut Vec<PropagationRecord>,
    ) -> Result<(), BridgeError> {
        let number = block.block_number();
        log_block_event!(info, "Processing block", number, block.hash, transactions = block.transactions.len(), uncles = block.uncles.len());

        let header = self.builder.header(block)?;
        records.push(self.offer(header).await);

        let transactions = self.builder.transactions(block)?;
        let uncles = self.fetch_uncles(block).await?;
        let body = self.builder.body(block, &transactions, &uncles)?;
        records.push(self.offer(body).await);

        let receipts = self.collect_receipts(block, &transactions).await?;
        let receipts = self.verified_receipts(block, &receipts)?;
        records.push(self.offer(receipts).await);

        log_block_event!(debug, "Block content offered", number, block.hash);
        Ok(())
    }

    /// Push `item` once and evaluate it against the threshold.
    pub async fn offer(&self, item: ContentItem) -> PropagationRecord {
        let mut record = PropagationRecord::new(item);
        let result = self.propagator.push(&record.item).await;
        record.record_push(result);
        let state = record.evaluate(self.threshold);
        log_content_event!(
            debug,
            "Initial offer evaluated",
            record.item.key,
            state = ?state,
            result = %record.last_result
        );
        record
    }

    async fn fetch_uncles(&self, block: &BlockFields) -> Result<Vec<BlockFields>, BridgeError> {
        let mut uncles = Vec::with_capacity(block.uncles.len());
        for index in 0..block.uncles.len() as u64 {
            let uncle = self
                .source
                .uncle(block.hash, index)
                .await?
                .ok_or_else(|| {
                    BridgeError::BlockNotFound(format!("uncle {index} of block {:?}", block.hash))
                })?;
            uncles.push(uncle);
        }
        Ok(uncles)
    }

    async fn collect_receipts(
        &self,
        block: &BlockFields,
        transactions: &[CanonicalTransaction],
    ) -> Result<Vec<ReceiptFields>, BridgeError> {
        info!(block_number = block.block_number(), count = transactions.len(), "Collecting receipts to propagate");
        let mut receipts = Vec::with_capacity(transactions.len());
        for tx in transactions {
            match self.wait_for_receipt(tx.hash()).await {
                Ok(receipt) => receipts.push(receipt),
                Err(e) => {
                    log_block_event!(warn, "Transaction receipt never appeared", block.block_number(), block.hash, tx_hash = ?tx.hash());
                    return Err(e);
                }
            }
        }
        debug!(block_number = block.block_number(), "Collected receipts");
        Ok(receipts)
    }

    /// Poll for a receipt until it exists or the maximum wait elapses.
    pub async fn wait_for_receipt(&self, tx_hash: Hash) -> Result<ReceiptFields, BridgeError> {
        let max_wait = self.receipts.max_wait();
        match tokio::time::timeout(max_wait, self.poll_receipt(tx_hash)).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::ReceiptUnavailable {
                transaction_hash: tx_hash,
                waited: max_wait,
            }),
        }
    }

    async fn poll_receipt(&self, tx_hash: Hash) -> Result<ReceiptFields, BridgeError> {
        loop {
            if let Some(receipt) = self.source.transaction_receipt(tx_hash).await? {
                return Ok(receipt);
            }
            tokio::time::sleep(self.receipts.poll_interval()).await;
        }
    }

    /// Receipts content, or the archived encodings on a root mismatch.
    fn verified_receipts(
        &self,
        block: &BlockFields,
        receipts: &[ReceiptFields],
    ) -> Result<ContentItem, BridgeError> {
        let number = block.block_number();
        let encoded = self.builder.encode_receipts(block, receipts)?;
        match self.builder.receipts(block, &encoded) {
            Err(BridgeError::Encoding(source)) if source.is_mismatch() => {
                let preserved_at = match self.archive.preserve(&block.receipts_root, number, &encoded) {
                    Ok(path) => Some(path),
                    Err(e) => {
                        log_block_event!(error, "Could not preserve invalid receipts", number, block.hash, error = %e);
                        None
                    }
                };
                Err(BridgeError::ReceiptsMismatch {
                    block_number: number,
                    source,
                    preserved_at,
                })
            }
            other => other,
        }
    }
}
