//! # Outbound Ports
//!
//! The chain-data source the bridge reads blocks and receipts from.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{BlockFields, Hash, ReceiptFields};

use crate::domain::BridgeError;

/// Read access to a canonical chain.
///
/// All lookups return `Ok(None)` for data the source does not know (yet);
/// errors are reserved for transport or protocol failures.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Block with full transaction objects.
    async fn block_by_hash(&self, hash: Hash) -> Result<Option<BlockFields>, BridgeError>;

    /// Block with full transaction objects.
    async fn block_by_number(&self, number: u64) -> Result<Option<BlockFields>, BridgeError>;

    async fn latest_block_number(&self) -> Result<u64, BridgeError>;

    /// Uncle header `index` of the block `block_hash`.
    async fn uncle(&self, block_hash: Hash, index: u64) -> Result<Option<BlockFields>, BridgeError>;

    async fn transaction_receipt(&self, tx_hash: Hash) -> Result<Option<ReceiptFields>, BridgeError>;

    /// Start a new-block-hash subscription; returns its id.
    async fn new_block_filter(&self) -> Result<String, BridgeError>;

    /// Hashes that arrived since the last poll, in arrival order.
    ///
    /// A subscription the source no longer knows yields
    /// [`BridgeError::SubscriptionDropped`].
    async fn filter_changes(&self, filter_id: &str) -> Result<Vec<Hash>, BridgeError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// One scripted answer of [`MockChainSource::filter_changes`].
#[derive(Debug, Clone)]
pub enum FilterEvent {
    NewBlocks(Vec<Hash>),
    Dropped,
}

/// In-memory chain for tests.
#[derive(Default)]
pub struct MockChainSource {
    blocks: RwLock<HashMap<Hash, BlockFields>>,
    uncles: RwLock<HashMap<(Hash, u64), BlockFields>>,
    receipts: RwLock<HashMap<Hash, ReceiptFields>>,
    /// Lookups answered with `None` before a receipt shows up.
    receipt_delay: usize,
    receipt_lookups: Mutex<HashMap<Hash, usize>>,
    filter_events: Mutex<VecDeque<FilterEvent>>,
    filters_created: AtomicUsize,
}

impl MockChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(self, block: BlockFields) -> Self {
        self.blocks.write().insert(block.hash, block);
        self
    }

    pub fn with_uncle(self, block_hash: Hash, index: u64, uncle: BlockFields) -> Self {
        self.uncles.write().insert((block_hash, index), uncle);
        self
    }

    pub fn with_receipts<I: IntoIterator<Item = ReceiptFields>>(self, receipts: I) -> Self {
        {
            let mut stored = self.receipts.write();
            for receipt in receipts {
                stored.insert(receipt.transaction_hash, receipt);
            }
        }
        self
    }

    pub fn with_receipt_delay(mut self, lookups: usize) -> Self {
        self.receipt_delay = lookups;
        self
    }

    pub fn with_filter_events<I: IntoIterator<Item = FilterEvent>>(self, events: I) -> Self {
        self.filter_events.lock().extend(events);
        self
    }

    pub fn filters_created(&self) -> usize {
        self.filters_created.load(Ordering::SeqCst)
    }

    pub fn receipt_lookups(&self, tx_hash: &Hash) -> usize {
        self.receipt_lookups.lock().get(tx_hash).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ChainSource for MockChainSource {
    async fn block_by_hash(&self, hash: Hash) -> Result<Option<BlockFields>, BridgeError> {
        Ok(self.blocks.read().get(&hash).cloned())
    }

    async fn block_by_number(&self, number: u64) -> Result<Option<BlockFields>, BridgeError> {
        Ok(self
            .blocks
            .read()
            .values()
            .find(|b| b.block_number() == number)
            .cloned())
    }

    async fn latest_block_number(&self) -> Result<u64, BridgeError> {
        Ok(self
            .blocks
            .read()
            .values()
            .map(BlockFields::block_number)
            .max()
            .unwrap_or(0))
    }

    async fn uncle(&self, block_hash: Hash, index: u64) -> Result<Option<BlockFields>, BridgeError> {
        Ok(self.uncles.read().get(&(block_hash, index)).cloned())
    }

    async fn transaction_receipt(&self, tx_hash: Hash) -> Result<Option<ReceiptFields>, BridgeError> {
        let lookups = {
            let mut counts = self.receipt_lookups.lock();
            let count = counts.entry(tx_hash).or_insert(0);
            *count += 1;
            *count
        };
        if lookups <= self.receipt_delay {
            return Ok(None);
        }
        Ok(self.receipts.read().get(&tx_hash).cloned())
    }

    async fn new_block_filter(&self) -> Result<String, BridgeError> {
        let n = self.filters_created.fetch_add(1, Ordering::SeqCst);
        Ok(format!("0x{:x}", n + 1))
    }

    async fn filter_changes(&self, filter_id: &str) -> Result<Vec<Hash>, BridgeError> {
        match self.filter_events.lock().pop_front() {
            Some(FilterEvent::NewBlocks(hashes)) => Ok(hashes),
            Some(FilterEvent::Dropped) => Err(BridgeError::SubscriptionDropped(format!(
                "filter {filter_id} not found"
            ))),
            None => Ok(Vec::new()),
        }
    }
}
