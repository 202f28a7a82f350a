//! Nonce resolution
//!
//! The node's transaction count lags behind transactions this process has
//! already broadcast but that are not yet mined. Callers sending several
//! transactions in a row thread `previous nonce + 1` forward as an estimate;
//! the resolved nonce is the larger of the two. No state is kept here, so
//! two uncoordinated senders on one address can still collide.

use crate::rpc::Node;
use alloy::primitives::Address;
use eyre::{Context, Result};

/// Pick the nonce to sign with
pub fn reconcile(on_chain: u64, estimate: u64) -> u64 {
    on_chain.max(estimate)
}

/// Resolve the next usable nonce for `address`
pub async fn resolve_nonce<N: Node>(node: &N, address: Address, estimate: u64) -> Result<u64> {
    let on_chain = node
        .transaction_count(address)
        .await
        .context("Failed to resolve nonce")?;

    let nonce = reconcile(on_chain, estimate);
    tracing::debug!(%address, on_chain, estimate, nonce, "Resolved nonce");

    Ok(nonce)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockNode;

    #[test]
    fn test_reconcile_is_max() {
        for (on_chain, estimate) in [(0, 0), (5, 2), (2, 5), (7, 7), (0, u64::MAX)] {
            assert_eq!(reconcile(on_chain, estimate), on_chain.max(estimate));
        }
    }

    #[tokio::test]
    async fn test_node_value_wins_when_estimate_is_stale() {
        let node = MockNode::new().with_transaction_count(12);
        let nonce = resolve_nonce(&node, Address::ZERO, 3).await.unwrap();
        assert_eq!(nonce, 12);
    }

    #[tokio::test]
    async fn test_estimate_wins_when_node_lags() {
        let node = MockNode::new().with_transaction_count(4);
        let nonce = resolve_nonce(&node, Address::ZERO, 6).await.unwrap();
        assert_eq!(nonce, 6);
    }
}
