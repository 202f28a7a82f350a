//! Scripted in-memory node for lifecycle tests

use super::Node;
use crate::types::Receipt;
use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use alloy::transports::TransportError;
use eyre::Result;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted answer to `eth_getTransactionReceipt`
#[derive(Debug, Clone, Copy)]
pub(crate) enum Reply {
    /// `null` result
    Pending,
    /// Error response saying the transaction is unknown
    NotFound,
    /// Response body that does not deserialize
    Malformed,
    /// Any other node error
    Failure,
    /// Mined with the given status
    Mined(bool),
    /// Never answers
    Hang,
}

pub(crate) struct MockNode {
    pub chain_id: u64,
    pub transaction_count: u64,
    pub gas_price: u128,
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<Bytes>>,
    polls: AtomicUsize,
    gas_price_calls: AtomicUsize,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            chain_id: 56,
            transaction_count: 0,
            gas_price: 5_000_000_000,
            replies: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            polls: AtomicUsize::new(0),
            gas_price_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_transaction_count(mut self, count: u64) -> Self {
        self.transaction_count = count;
        self
    }

    /// Queue receipt replies; once exhausted every poll sees `Pending`
    pub fn with_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.replies.lock().unwrap().extend(replies);
        self
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn gas_price_calls(&self) -> usize {
        self.gas_price_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap().clone()
    }

    fn receipt(tx_hash: TxHash, status: bool) -> Receipt {
        Receipt {
            transaction_hash: tx_hash,
            status,
            block_number: Some(1),
            block_hash: None,
            gas_used: 21_000,
            logs: Vec::new(),
        }
    }
}

pub(crate) fn malformed_error() -> eyre::Report {
    let serde_err = serde_json::from_str::<u64>("{").unwrap_err();
    eyre::Report::new(<TransportError>::deser_err(serde_err, "{"))
        .wrap_err("Failed to get transaction receipt")
}

impl Node for MockNode {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64> {
        Ok(self.transaction_count)
    }

    async fn gas_price(&self) -> Result<u128> {
        self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.gas_price)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        self.sent.lock().unwrap().push(Bytes::copy_from_slice(raw));
        Ok(keccak256(raw))
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<Receipt>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Pending);

        match reply {
            Reply::Pending => Ok(None),
            Reply::NotFound => Err(eyre::eyre!("transaction not found")),
            Reply::Malformed => Err(malformed_error()),
            Reply::Failure => Err(eyre::eyre!("429 Too Many Requests")),
            Reply::Mined(status) => Ok(Some(Self::receipt(tx_hash, status))),
            Reply::Hang => std::future::pending().await,
        }
    }
}
