//! HTTP JSON-RPC client bound to one chain endpoint

use super::Node;
use crate::config::ChainEndpoint;
use crate::constants::RPC_REQUEST_TIMEOUT;
use crate::types::Receipt;
use alloy::eips::{BlockId, BlockNumberOrTag};
use alloy::network::{Ethereum, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::client::RpcClient as JsonRpcClient;
use alloy::rpc::types::{Block, Filter, Log, TransactionRequest};
use alloy::transports::http::reqwest::{self, Url};
use alloy::transports::http::Http;
use eyre::{Context, Result};
use std::sync::Arc;

/// Type alias for the read-only provider
type ReadProvider = Arc<RootProvider<Ethereum>>;

/// Connection context: one transport plus the endpoint it talks to
///
/// Cheap to clone; clones share the underlying HTTP connection pool, so one
/// client can serve concurrent read queries from many tasks.
#[derive(Clone)]
pub struct RpcClient {
    provider: ReadProvider,
    endpoint: ChainEndpoint,
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl RpcClient {
    /// Create a client for `endpoint` without contacting the node
    pub fn new(endpoint: ChainEndpoint) -> Result<Self> {
        let url: Url = endpoint.rpc_url.parse().context("Invalid RPC URL")?;

        let http = reqwest::Client::builder()
            .timeout(RPC_REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        let client = JsonRpcClient::new(Http::with_client(http, url), false);

        // Read-only provider without fillers: nonce, gas and signing are
        // handled explicitly by the lifecycle
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_client(client);

        Ok(Self {
            provider: Arc::new(provider),
            endpoint,
        })
    }

    /// Endpoint this client is bound to
    pub fn endpoint(&self) -> &ChainEndpoint {
        &self.endpoint
    }

    /// Chain ID transactions are signed for
    pub fn chain_id(&self) -> u64 {
        self.endpoint.chain_id
    }

    /// Underlying alloy provider, for calls not wrapped here
    pub fn provider(&self) -> &RootProvider<Ethereum> {
        &self.provider
    }

    /// Liveness probe; returns the chain id reported by the node
    pub async fn probe(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .context("Failed to fetch chain id")
    }

    // ========== Account State ==========

    /// Native token balance in wei
    pub async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .context("Failed to get balance")
    }

    /// Transaction count (next nonce) at the latest block
    pub async fn transaction_count(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .context("Failed to get transaction count")
    }

    // ========== Fees ==========

    /// Suggested legacy gas price in wei
    pub async fn gas_price(&self) -> Result<u128> {
        self.provider
            .get_gas_price()
            .await
            .context("Failed to get gas price")
    }

    /// Base fee of the latest block, from `eth_feeHistory`
    pub async fn base_fee(&self) -> Result<u128> {
        let history = self
            .provider
            .get_fee_history(1, BlockNumberOrTag::Latest, &[])
            .await
            .context("Failed to get fee history")?;

        history
            .base_fee_per_gas
            .first()
            .copied()
            .ok_or_else(|| eyre::eyre!("Fee history returned no base fee"))
    }

    /// Suggested EIP-1559 priority fee in wei
    pub async fn max_priority_fee(&self) -> Result<u128> {
        self.provider
            .get_max_priority_fee_per_gas()
            .await
            .context("Failed to get max priority fee")
    }

    /// Base fee and priority fee, fetched concurrently
    pub async fn fee_components(&self) -> Result<(u128, u128)> {
        futures::future::try_join(self.base_fee(), self.max_priority_fee()).await
    }

    // ========== Calls & Blocks ==========

    /// `eth_call` against `to` with raw call data
    pub async fn call(&self, to: Address, data: impl Into<Bytes>) -> Result<Bytes> {
        self.provider
            .call(
                TransactionRequest::default()
                    .with_to(to)
                    .with_input(data),
            )
            .await
            .context("Failed to call contract")
    }

    /// `eth_estimateGas` for an arbitrary request
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> Result<u64> {
        self.provider
            .estimate_gas(tx)
            .await
            .context("Failed to estimate gas")
    }

    /// Logs matching `filter`
    pub async fn logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        self.provider
            .get_logs(filter)
            .await
            .context("Failed to get logs")
    }

    /// Latest block number
    pub async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .context("Failed to get block number")
    }

    /// Block by number, tag or hash (transaction hashes only)
    pub async fn block(&self, block: impl Into<BlockId>) -> Result<Option<Block>> {
        self.provider
            .get_block(block.into())
            .await
            .context("Failed to get block")
    }

    // ========== Transactions ==========

    /// Broadcast a signed raw transaction
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .context("Failed to send raw transaction")?;

        Ok(*pending.tx_hash())
    }

    /// Receipt for `tx_hash`, or `None` if it is not mined yet
    pub async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .context("Failed to get transaction receipt")?;

        Ok(receipt.map(Receipt::from))
    }
}

impl Node for RpcClient {
    fn chain_id(&self) -> u64 {
        self.endpoint.chain_id
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        RpcClient::transaction_count(self, address).await
    }

    async fn gas_price(&self) -> Result<u128> {
        RpcClient::gas_price(self).await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        RpcClient::send_raw_transaction(self, raw).await
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>> {
        RpcClient::transaction_receipt(self, tx_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = RpcClient::new(ChainEndpoint::from_url("not a url", 1)).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_new_does_not_contact_node() {
        let endpoint = ChainEndpoint::new("local", "http://127.0.0.1:1", 31337);
        let client = RpcClient::new(endpoint).unwrap();
        assert_eq!(client.chain_id(), 31337);
        assert_eq!(Node::chain_id(&client), 31337);
        assert_eq!(client.endpoint().name, "local");
    }

    #[tokio::test]
    async fn test_unreachable_node_propagates_error() {
        let client = RpcClient::new(ChainEndpoint::from_url("http://127.0.0.1:1", 1)).unwrap();
        let err = client.block_number().await.unwrap_err();
        assert!(err.to_string().contains("Failed to get block number"));
    }
}
