//! Transaction and message signing
//!
//! Signing is a trait so the lifecycle does not care where keys live. The
//! bundled [`LocalSigner`] holds a raw secp256k1 private key in memory for as
//! long as the caller keeps it alive.

mod local;

pub use local::{recover_message_signer, LocalSigner};

use crate::types::TxRequest;
use alloy::primitives::{Bytes, Signature, TxHash};
use eyre::Result;

/// A signed transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    /// The request that was signed
    pub request: TxRequest,
    /// ECDSA signature (r, s, y-parity)
    pub signature: Signature,
    /// EIP-2718 encoded bytes
    pub raw: Bytes,
    /// Transaction hash (keccak256 of `raw`)
    pub hash: TxHash,
}

/// Trait for signing EVM transactions and text messages
pub trait TransactionSigner: Send + Sync {
    /// Returns the signer's EVM address
    fn address(&self) -> alloy::primitives::Address;

    /// Signs a fully resolved transaction for `request.chain_id`
    ///
    /// Legacy pricing yields an EIP-155 transaction, EIP-1559 pricing a typed
    /// (type 2) transaction.
    fn sign_transaction(&self, request: TxRequest) -> Result<SignedTransaction>;

    /// Signs `message` with the EIP-191 personal-message prefix and returns
    /// the 65-byte signature as `0x` hex
    fn sign_message(&self, message: &str) -> Result<String>;
}
