//! Raw call-data encoding without an ABI document
//!
//! Call data is built from the literal function signature text (e.g.
//! `"balanceOf(address)"`) and positional arguments with caller-declared
//! canonical types. Nothing checks the types against the contract: a wrong
//! signature produces a call that reverts or returns garbage.

use crate::constants::ERC20_TRANSFER_SELECTOR;
use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{keccak256, Address, Bytes, Selector, U256};
use eyre::{ensure, Context, Result};

/// First 4 bytes of keccak256 over the exact signature text
pub fn function_selector(signature: &str) -> Selector {
    let hash = keccak256(signature.as_bytes());
    Selector::from_slice(&hash[..4])
}

/// ABI-encode positional arguments as function parameters
///
/// Each argument string is coerced to its declared type, so `"1000"` works
/// for `uint256` and `"0x..."` for `address`.
pub fn encode_args(types: &[&str], args: &[&str]) -> Result<Bytes> {
    ensure!(
        types.len() == args.len(),
        "Argument count mismatch: {} types, {} args",
        types.len(),
        args.len()
    );

    let values = types
        .iter()
        .zip(args)
        .map(|(ty, arg)| {
            let sol_type = DynSolType::parse(ty)
                .with_context(|| format!("Invalid ABI type {}", ty))?;
            sol_type
                .coerce_str(arg)
                .with_context(|| format!("Failed to coerce {:?} to {}", arg, ty))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DynSolValue::Tuple(values).abi_encode_params().into())
}

/// Build call data from a signature and optional typed arguments
///
/// When either list is `None` the call data is the bare selector.
pub fn encode_call(
    signature: &str,
    types: Option<&[&str]>,
    args: Option<&[&str]>,
) -> Result<Bytes> {
    let selector = function_selector(signature);
    let mut data = selector.to_vec();

    if let (Some(types), Some(args)) = (types, args) {
        let encoded = encode_args(types, args)
            .with_context(|| format!("Failed to encode arguments for {}", signature))?;
        data.extend_from_slice(&encoded);
    }

    Ok(data.into())
}

/// Build call data from a signature and already-typed values
pub fn encode_call_values(signature: &str, values: &[DynSolValue]) -> Bytes {
    let mut data = function_selector(signature).to_vec();
    data.extend(DynSolValue::Tuple(values.to_vec()).abi_encode_params());
    data.into()
}

/// Call data for ERC-20 `transfer(receiver, amount)`
///
/// Fixed layout: selector, then receiver and amount each as a 32-byte word.
pub fn erc20_transfer_data(receiver: Address, amount: U256) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32 + 32);
    data.extend_from_slice(&ERC20_TRANSFER_SELECTOR);
    data.extend_from_slice(receiver.into_word().as_slice());
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    data.into()
}

/// Read a single `uint256` return word
pub fn decode_uint(data: &[u8]) -> Result<U256> {
    ensure!(
        data.len() >= 32,
        "Return data too short for uint256: {} bytes",
        data.len()
    );
    Ok(U256::from_be_slice(&data[..32]))
}
