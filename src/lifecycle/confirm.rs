//! Receipt polling and confirmation policy
//!
//! After broadcast the node is polled for a receipt at a fixed interval until
//! the transaction is mined or the timeout runs out. Public RPC endpoints are
//! flaky, so errors while polling do not abort the wait by default: they are
//! classified, logged and retried within the same time budget.

use crate::constants::{DEFAULT_CONFIRM_TIMEOUT, DEFAULT_POLL_INTERVAL};
use crate::rpc::Node;
use crate::types::ConfirmationOutcome;
use alloy::primitives::TxHash;
use alloy::transports::{RpcError, TransportError};
use eyre::Report;
use std::time::Duration;
use tokio::time::{self, Instant};

/// How long and how often to poll for a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPolicy {
    /// Total time budget for the wait
    pub timeout: Duration,
    /// Delay between receipt polls
    pub poll_interval: Duration,
    /// Give up with `Errored` after this many consecutive node errors.
    /// `None` retries errors until the timeout.
    pub max_consecutive_errors: Option<u32>,
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CONFIRM_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_consecutive_errors: None,
        }
    }
}

impl ConfirmPolicy {
    /// Set the total wait budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the delay between polls
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Abort after `limit` consecutive node errors
    pub fn with_max_consecutive_errors(mut self, limit: u32) -> Self {
        self.max_consecutive_errors = Some(limit);
        self
    }

    /// Upper bound on receipt polls: `ceil(timeout / poll_interval)`, at
    /// least one
    pub fn max_attempts(&self) -> u64 {
        let interval = self.poll_interval.as_nanos().max(1);
        let attempts = self.timeout.as_nanos().div_ceil(interval).max(1);
        u64::try_from(attempts).unwrap_or(u64::MAX)
    }
}

/// Kind of error seen while polling for a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollFault {
    /// The node does not know the transaction yet; still pending
    NotYetIncluded,
    /// The node answered with something that could not be decoded
    Malformed,
    /// Transport or node-side failure (rate limits, 5xx, timeouts)
    Transport,
}

impl PollFault {
    /// Whether this fault counts towards `max_consecutive_errors`
    pub fn is_error(self) -> bool {
        !matches!(self, PollFault::NotYetIncluded)
    }
}

/// Classify an error returned by a receipt poll
pub fn classify_poll_error(error: &Report) -> PollFault {
    if let Some(rpc_error) = error.downcast_ref::<TransportError>() {
        match rpc_error {
            RpcError::DeserError { .. } => return PollFault::Malformed,
            RpcError::ErrorResp(payload) if is_not_found(&payload.message) => {
                return PollFault::NotYetIncluded
            }
            _ => {}
        }
    }

    if error.chain().any(|cause| is_not_found(&cause.to_string())) {
        PollFault::NotYetIncluded
    } else {
        PollFault::Transport
    }
}

fn is_not_found(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("transaction") && message.contains("not found")
}

/// Poll for the receipt of `tx_hash` until it is mined or the policy's time
/// budget runs out
///
/// `TimedOut` is only returned once the full timeout has elapsed, even when
/// the poll budget is used up earlier.
pub async fn wait_for_confirmation<N: Node>(
    node: &N,
    tx_hash: TxHash,
    policy: &ConfirmPolicy,
) -> ConfirmationOutcome {
    let deadline = Instant::now() + policy.timeout;
    let max_attempts = policy.max_attempts();
    let mut consecutive_errors = 0u32;

    for attempt in 1..=max_attempts {
        let poll = node.transaction_receipt(tx_hash);
        let polled = match time::timeout_at(deadline, poll).await {
            Ok(polled) => polled,
            Err(_) => break,
        };

        match polled {
            Ok(Some(receipt)) => {
                let outcome = ConfirmationOutcome::from_receipt(receipt);
                match &outcome {
                    ConfirmationOutcome::Confirmed(_) => {
                        tracing::info!("Transaction {} confirmed", tx_hash)
                    }
                    _ => tracing::error!("Transaction {} reverted", tx_hash),
                }
                return outcome;
            }
            Ok(None) => {
                consecutive_errors = 0;
                tracing::debug!(attempt, max_attempts, "Transaction {} pending", tx_hash);
            }
            Err(err) => match classify_poll_error(&err) {
                PollFault::NotYetIncluded => {
                    consecutive_errors = 0;
                    tracing::debug!(
                        attempt,
                        max_attempts,
                        "Transaction {} not found yet",
                        tx_hash
                    );
                }
                fault => {
                    consecutive_errors += 1;
                    tracing::warn!(
                        ?fault,
                        consecutive_errors,
                        "Receipt poll for {} failed: {:#}",
                        tx_hash,
                        err
                    );
                    if policy
                        .max_consecutive_errors
                        .is_some_and(|limit| consecutive_errors >= limit)
                    {
                        tracing::error!(
                            "Giving up on {} after {} consecutive errors",
                            tx_hash,
                            consecutive_errors
                        );
                        return ConfirmationOutcome::Errored(err);
                    }
                }
            },
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        time::sleep(policy.poll_interval.min(deadline - now)).await;
    }

    tracing::error!("Transaction {} timed out after {:?}", tx_hash, policy.timeout);
    ConfirmationOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::{malformed_error, MockNode, Reply};

    fn policy(timeout_ms: u64, interval_ms: u64) -> ConfirmPolicy {
        ConfirmPolicy::default()
            .with_timeout(Duration::from_millis(timeout_ms))
            .with_poll_interval(Duration::from_millis(interval_ms))
    }

    #[test]
    fn test_max_attempts_rounds_up() {
        assert_eq!(ConfirmPolicy::default().max_attempts(), 600);
        assert_eq!(policy(2_000, 500).max_attempts(), 4);
        assert_eq!(policy(2_100, 500).max_attempts(), 5);
        assert_eq!(policy(100, 500).max_attempts(), 1);
        assert_eq!(policy(0, 500).max_attempts(), 1);
    }

    #[test]
    fn test_classify_poll_errors() {
        assert_eq!(classify_poll_error(&malformed_error()), PollFault::Malformed);
        assert_eq!(
            classify_poll_error(&eyre::eyre!("Transaction not found")),
            PollFault::NotYetIncluded
        );
        assert_eq!(
            classify_poll_error(&eyre::eyre!("429 Too Many Requests")),
            PollFault::Transport
        );
        assert!(!PollFault::NotYetIncluded.is_error());
        assert!(PollFault::Malformed.is_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_after_exactly_n_polls() {
        let node = MockNode::new().with_replies([
            Reply::Pending,
            Reply::NotFound,
            Reply::Pending,
            Reply::Mined(true),
        ]);
        let hash = TxHash::repeat_byte(0x01);

        let outcome = wait_for_confirmation(&node, hash, &policy(10_000, 500)).await;

        assert_eq!(node.polls(), 4);
        match outcome {
            ConfirmationOutcome::Confirmed(receipt) => assert_eq!(receipt.transaction_hash, hash),
            other => panic!("expected confirmed, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_within_attempt_budget() {
        let node = MockNode::new();
        let policy = policy(2_000, 500);
        let started = Instant::now();

        let outcome = wait_for_confirmation(&node, TxHash::ZERO, &policy).await;

        assert!(matches!(outcome, ConfirmationOutcome::TimedOut));
        assert!(node.polls() as u64 <= policy.max_attempts());
        assert!(started.elapsed() >= policy.timeout);
        assert!(started.elapsed() <= policy.timeout + policy.poll_interval);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_poll_budget_still_waits_full_timeout() {
        let node = MockNode::new();
        let policy = policy(5_000, 5_000);
        let started = Instant::now();

        let outcome = wait_for_confirmation(&node, TxHash::ZERO, &policy).await;

        assert!(matches!(outcome, ConfirmationOutcome::TimedOut));
        assert_eq!(node.polls(), 1);
        assert_eq!(started.elapsed(), policy.timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_uneven_timeout_ends_at_deadline() {
        let node = MockNode::new();
        let policy = policy(2_100, 500);
        let started = Instant::now();

        let outcome = wait_for_confirmation(&node, TxHash::ZERO, &policy).await;

        assert!(matches!(outcome, ConfirmationOutcome::TimedOut));
        assert_eq!(node.polls(), 5);
        assert_eq!(started.elapsed(), policy.timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_poll_is_cut_at_deadline() {
        let node = MockNode::new().with_replies([Reply::Hang]);
        let policy = policy(3_000, 500);
        let started = Instant::now();

        let outcome = wait_for_confirmation(&node, TxHash::ZERO, &policy).await;

        assert!(matches!(outcome, ConfirmationOutcome::TimedOut));
        assert_eq!(node.polls(), 1);
        assert_eq!(started.elapsed(), policy.timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverted_is_distinct() {
        let node = MockNode::new().with_replies([Reply::Pending, Reply::Mined(false)]);
        let outcome = wait_for_confirmation(&node, TxHash::ZERO, &policy(5_000, 500)).await;

        assert!(matches!(outcome, ConfirmationOutcome::Reverted(_)));
        assert!(!outcome.is_confirmed());
        assert_eq!(outcome.receipt().map(|r| r.status), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_are_swallowed_by_default() {
        let node = MockNode::new().with_replies([
            Reply::Malformed,
            Reply::Failure,
            Reply::Malformed,
            Reply::Mined(true),
        ]);
        let outcome = wait_for_confirmation(&node, TxHash::ZERO, &policy(10_000, 500)).await;

        assert!(outcome.is_confirmed());
        assert_eq!(node.polls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_budget_ends_with_errored() {
        let node = MockNode::new().with_replies([
            Reply::Failure,
            Reply::NotFound,
            Reply::Malformed,
            Reply::Failure,
            Reply::Mined(true),
        ]);
        let policy = policy(10_000, 500).with_max_consecutive_errors(2);

        let outcome = wait_for_confirmation(&node, TxHash::ZERO, &policy).await;

        // the not-found reply resets the streak, so the budget is hit on poll 4
        assert_eq!(node.polls(), 4);
        match outcome {
            ConfirmationOutcome::Errored(err) => assert!(err.to_string().contains("429")),
            other => panic!("expected errored, got {:?}", other),
        }
    }
}
