//! Defaults and fixed values used across the SDK

use std::time::Duration;

/// Gas limit used when the caller does not supply one
pub const DEFAULT_GAS_LIMIT: u64 = 6_000_000;

/// How long a confirmed send waits for a receipt before giving up
pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(300);

/// Interval between `eth_getTransactionReceipt` polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Backoff between connection attempts during bootstrap
pub const CONNECT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound for a single HTTP round trip to the node
pub const RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `transfer(address,uint256)` selector
pub const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// ERC-20 balance query signature
pub const ERC20_BALANCE_OF: &str = "balanceOf(address)";

/// Name given to endpoints built from a bare URL
pub fn default_chain_name(chain_id: u64) -> String {
    format!("chain {}", chain_id)
}
