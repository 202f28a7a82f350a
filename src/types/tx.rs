//! Transaction request types for user-facing API

use crate::constants::DEFAULT_GAS_LIMIT;
use crate::encoding::erc20_transfer_data;
use crate::lifecycle::confirm::ConfirmPolicy;
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// How the transaction pays for gas
///
/// Amounts are wei, serialized as JSON-RPC hex quantities (`"0x12a05f200"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GasPricing {
    /// Single flat price per gas (legacy / EIP-155 transaction)
    Legacy {
        #[serde(with = "alloy::serde::quantity")]
        gas_price: u128,
    },
    /// Fee cap plus priority tip (EIP-1559 transaction)
    Eip1559 {
        #[serde(with = "alloy::serde::quantity")]
        max_fee_per_gas: u128,
        #[serde(with = "alloy::serde::quantity")]
        max_priority_fee_per_gas: u128,
    },
}

impl GasPricing {
    /// Flat gas price in wei
    pub fn legacy(gas_price: u128) -> Self {
        Self::Legacy { gas_price }
    }

    /// EIP-1559 fee cap and tip in wei
    pub fn eip1559(max_fee_per_gas: u128, max_priority_fee_per_gas: u128) -> Self {
        Self::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        }
    }

    /// Highest price per gas this policy may pay
    pub fn max_price_per_gas(&self) -> u128 {
        match self {
            Self::Legacy { gas_price } => *gas_price,
            Self::Eip1559 {
                max_fee_per_gas, ..
            } => *max_fee_per_gas,
        }
    }
}

/// Caller-facing transaction parameters
///
/// Everything that is not known up front (sender, nonce, chain id, default
/// gas price) is filled in by [`crate::lifecycle::submit`].
#[derive(Debug, Clone)]
pub struct TxParams {
    /// Destination address
    pub to: Address,
    /// Value in wei
    pub value: U256,
    /// Call data
    pub data: Bytes,
    /// Gas limit
    pub gas_limit: u64,
    /// Gas pricing; the node's `eth_gasPrice` is used when `None`
    pub gas: Option<GasPricing>,
    /// Lowest nonce the caller is willing to use (usually the previous
    /// submission's nonce + 1)
    pub nonce: u64,
}

impl TxParams {
    /// Plain call to `to` with no value and no data
    pub fn new(to: Address) -> Self {
        Self {
            to,
            value: U256::ZERO,
            data: Bytes::new(),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas: None,
            nonce: 0,
        }
    }

    /// ERC-20 `transfer(receiver, amount)` sent to the token contract
    pub fn erc20_transfer(token: Address, receiver: Address, amount: U256) -> Self {
        Self::new(token).with_data(erc20_transfer_data(receiver, amount))
    }

    /// Set transaction value
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set call data
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    /// Set gas limit
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Set gas pricing
    pub fn with_gas(mut self, gas: GasPricing) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Set the caller's nonce estimate
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }
}

/// Fully resolved transaction, ready for signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub gas_limit: u64,
    pub gas: GasPricing,
    pub chain_id: u64,
    pub nonce: u64,
}

/// What `submit` does after broadcasting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitMode {
    /// Return as soon as the node accepted the raw transaction. No receipt
    /// is fetched; confirming is the caller's concern.
    Broadcast,
    /// Poll for the receipt according to the policy
    Confirm(ConfirmPolicy),
}

impl Default for WaitMode {
    fn default() -> Self {
        WaitMode::Confirm(ConfirmPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let params = TxParams::new(Address::ZERO);
        assert_eq!(params.value, U256::ZERO);
        assert!(params.data.is_empty());
        assert_eq!(params.gas_limit, 6_000_000);
        assert!(params.gas.is_none());
        assert_eq!(params.nonce, 0);
    }

    #[test]
    fn test_erc20_transfer_params() {
        let token = Address::repeat_byte(0x11);
        let params = TxParams::erc20_transfer(token, Address::repeat_byte(0x22), U256::from(5));
        assert_eq!(params.to, token);
        assert_eq!(params.value, U256::ZERO);
        assert_eq!(params.data.len(), 68);
    }

    #[test]
    fn test_gas_pricing_serde_is_tagged() {
        let json = serde_json::to_value(GasPricing::eip1559(30, 2)).unwrap();
        assert_eq!(json["type"], "eip1559");
        assert_eq!(json["max_fee_per_gas"], "0x1e");
        assert_eq!(json["max_priority_fee_per_gas"], "0x2");

        let legacy: GasPricing =
            serde_json::from_str(r#"{"type":"legacy","gas_price":"0x12a05f200"}"#).unwrap();
        assert_eq!(legacy, GasPricing::legacy(5_000_000_000));
        assert_eq!(legacy.max_price_per_gas(), 5_000_000_000);

        let eip1559: GasPricing = serde_json::from_value(json).unwrap();
        assert_eq!(eip1559, GasPricing::eip1559(30, 2));
    }
}
