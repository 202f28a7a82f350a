//! Node access
//!
//! [`Node`] is the narrow surface the transaction lifecycle needs from a
//! JSON-RPC node. [`RpcClient`] implements it over HTTP and adds the
//! read-only queries callers use directly.

mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use client::RpcClient;

use crate::types::Receipt;
use alloy::primitives::{Address, TxHash};
use eyre::Result;
use std::future::Future;

/// Trait for the node calls used while submitting and confirming
pub trait Node: Send + Sync {
    /// Chain ID of the connected network
    fn chain_id(&self) -> u64;

    /// `eth_getTransactionCount` at the latest block
    fn transaction_count(&self, address: Address) -> impl Future<Output = Result<u64>> + Send;

    /// `eth_gasPrice` in wei
    fn gas_price(&self) -> impl Future<Output = Result<u128>> + Send;

    /// `eth_sendRawTransaction`, returning the hash reported by the node
    fn send_raw_transaction(&self, raw: &[u8]) -> impl Future<Output = Result<TxHash>> + Send;

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending
    fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = Result<Option<Receipt>>> + Send;
}
