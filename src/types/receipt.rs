//! Receipt and confirmation outcome types

use alloy::primitives::{TxHash, B256};
use alloy::rpc::types::{Log, TransactionReceipt};
use eyre::Report;

/// Receipt of a mined transaction, as reported by the node
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Transaction hash
    pub transaction_hash: TxHash,
    /// `true` if execution succeeded, `false` if it reverted
    pub status: bool,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    pub block_hash: Option<B256>,
    /// Gas consumed by the transaction
    pub gas_used: u64,
    /// Emitted logs, in order
    pub logs: Vec<Log>,
}

impl From<TransactionReceipt> for Receipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            status: receipt.status(),
            block_number: receipt.block_number,
            block_hash: receipt.block_hash,
            gas_used: receipt.gas_used,
            logs: receipt.inner.logs().to_vec(),
        }
    }
}

/// Terminal result of waiting for a transaction
#[derive(Debug)]
pub enum ConfirmationOutcome {
    /// Mined and succeeded
    Confirmed(Receipt),
    /// Mined but reverted
    Reverted(Receipt),
    /// No receipt before the timeout
    TimedOut,
    /// Waiting aborted because of repeated node errors
    Errored(Report),
}

impl ConfirmationOutcome {
    /// Classify a receipt by its status bit
    pub fn from_receipt(receipt: Receipt) -> Self {
        if receipt.status {
            Self::Confirmed(receipt)
        } else {
            Self::Reverted(receipt)
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    /// The receipt, if the transaction was mined (confirmed or reverted)
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            Self::Confirmed(receipt) | Self::Reverted(receipt) => Some(receipt),
            Self::TimedOut | Self::Errored(_) => None,
        }
    }

    /// Short label for log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Confirmed(_) => "confirmed",
            Self::Reverted(_) => "reverted",
            Self::TimedOut => "timed out",
            Self::Errored(_) => "errored",
        }
    }
}

/// Result of [`crate::lifecycle::submit`]
#[derive(Debug)]
pub struct Submission {
    /// Hash returned by `eth_sendRawTransaction`
    pub tx_hash: TxHash,
    /// Nonce the transaction was signed with
    pub nonce: u64,
    /// `None` when the transaction was only broadcast
    pub outcome: Option<ConfirmationOutcome>,
}

impl Submission {
    /// Nonce estimate for the sender's next transaction
    pub fn next_nonce(&self) -> u64 {
        self.nonce + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt(status: bool) -> Receipt {
        Receipt {
            transaction_hash: TxHash::repeat_byte(0xab),
            status,
            block_number: Some(10),
            block_hash: None,
            gas_used: 21_000,
            logs: Vec::new(),
        }
    }

    #[test]
    fn test_outcome_from_receipt_status() {
        let ok = ConfirmationOutcome::from_receipt(receipt(true));
        assert!(ok.is_confirmed());
        assert_eq!(ok.label(), "confirmed");

        let reverted = ConfirmationOutcome::from_receipt(receipt(false));
        assert!(matches!(reverted, ConfirmationOutcome::Reverted(_)));
        assert_eq!(reverted.receipt().unwrap().block_number, Some(10));
    }

    #[test]
    fn test_terminal_outcomes_without_receipt() {
        assert!(ConfirmationOutcome::TimedOut.receipt().is_none());
        let errored = ConfirmationOutcome::Errored(eyre::eyre!("boom"));
        assert!(errored.receipt().is_none());
        assert!(!errored.is_confirmed());
    }

    #[test]
    fn test_next_nonce() {
        let submission = Submission {
            tx_hash: TxHash::ZERO,
            nonce: 7,
            outcome: None,
        };
        assert_eq!(submission.next_nonce(), 8);
    }
}
