//! txpilot
//!
//! A Rust SDK for submitting signed transactions to EVM chains over JSON-RPC.
//!
//! # Features
//!
//! - Connect to a node, retrying until it is reachable
//! - Sign legacy and EIP-1559 transactions locally
//! - Send native value, ERC-20 transfers and raw contract calls
//! - Wait for confirmation with a bounded, explicit polling policy
//!
//! # Example
//!
//! ```rust,ignore
//! use txpilot::{ChainEndpoint, EvmClient, LocalSigner, TxParams, WaitMode};
//! use alloy::primitives::{address, U256};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let endpoint = ChainEndpoint::new("bsc", "https://bsc-dataseed.binance.org", 56);
//!     let signer = LocalSigner::from_private_key("0x...")?;
//!     let client = EvmClient::connect(endpoint, signer).await?;
//!
//!     let to = address!("0x000000000000000000000000000000000000dEaD");
//!     let submission = client
//!         .send_transaction(TxParams::new(to).with_value(U256::from(1)), &WaitMode::default())
//!         .await?;
//!     println!("{} {:?}", submission.tx_hash, submission.outcome);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod lifecycle;
pub mod nonce;
pub mod rpc;
pub mod signer;
pub mod types;

// Re-export main types for convenience
pub use client::EvmClient;
pub use config::{ChainEndpoint, ChainRegistry, EndpointTarget};
pub use connection::{connect, connect_target, connect_until};
pub use encoding::{encode_args, encode_call, function_selector};
pub use error::{eyre, Context, Report, Result};
pub use lifecycle::{submit, ConfirmPolicy, PollFault};
pub use rpc::{Node, RpcClient};
pub use signer::{recover_message_signer, LocalSigner, SignedTransaction, TransactionSigner};
pub use types::{
    ConfirmationOutcome, GasPricing, Receipt, Submission, TxParams, TxRequest, WaitMode,
};
