//! Chain source backed by a standard execution-client JSON-RPC API.

use std::time::Duration;

use async_trait::async_trait;
use shared_types::{BlockFields, Hash, JsonRpcClient, ReceiptFields, RpcError, U64};
use tracing::debug;

use crate::domain::BridgeError;
use crate::ports::outbound::ChainSource;

const NO_PARAMS: [(); 0] = [];

/// `eth_*` reader over HTTP.
pub struct Web3ChainSource {
    client: JsonRpcClient,
}

impl Web3ChainSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, BridgeError> {
        Ok(Self {
            client: JsonRpcClient::new(url, timeout)?,
        })
    }

    pub fn url(&self) -> &str {
        self.client.url()
    }
}

#[async_trait]
impl ChainSource for Web3ChainSource {
    async fn block_by_hash(&self, hash: Hash) -> Result<Option<BlockFields>, BridgeError> {
        Ok(self.client.call("eth_getBlockByHash", (hash, true)).await?)
    }

    async fn block_by_number(&self, number: u64) -> Result<Option<BlockFields>, BridgeError> {
        Ok(self
            .client
            .call("eth_getBlockByNumber", (U64::from(number), true))
            .await?)
    }

    async fn latest_block_number(&self) -> Result<u64, BridgeError> {
        let number: U64 = self.client.call_required("eth_blockNumber", NO_PARAMS).await?;
        Ok(number.as_u64())
    }

    async fn uncle(&self, block_hash: Hash, index: u64) -> Result<Option<BlockFields>, BridgeError> {
        Ok(self
            .client
            .call("eth_getUncleByBlockHashAndIndex", (block_hash, U64::from(index)))
            .await?)
    }

    async fn transaction_receipt(&self, tx_hash: Hash) -> Result<Option<ReceiptFields>, BridgeError> {
        Ok(self.client.call("eth_getTransactionReceipt", [tx_hash]).await?)
    }

    async fn new_block_filter(&self) -> Result<String, BridgeError> {
        let id: String = self.client.call_required("eth_newBlockFilter", NO_PARAMS).await?;
        debug!(filter_id = %id, "Created new block filter");
        Ok(id)
    }

    async fn filter_changes(&self, filter_id: &str) -> Result<Vec<Hash>, BridgeError> {
        match self
            .client
            .call::<_, Vec<Hash>>("eth_getFilterChanges", [filter_id])
            .await
        {
            Ok(hashes) => Ok(hashes.unwrap_or_default()),
            // Nodes answer an error object once they have evicted the filter.
            Err(RpcError::Rpc { code, message }) => Err(BridgeError::SubscriptionDropped(format!(
                "filter {filter_id}: {code} {message}"
            ))),
            Err(e) => Err(e.into()),
        }
    }
}
