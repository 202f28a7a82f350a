//! Local private key signer implementation

use super::{SignedTransaction, TransactionSigner};
use crate::types::{GasPricing, TxRequest};
use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::hex;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Signature, TxKind};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use eyre::{ensure, Context, Result};
use std::fmt;

/// Local signer using a private key
///
/// `Debug` output only shows the address.
#[derive(Clone)]
pub struct LocalSigner {
    inner: PrivateKeySigner,
}

impl LocalSigner {
    /// Create a new LocalSigner from a private key hex string
    ///
    /// # Arguments
    ///
    /// * `private_key` - Hex-encoded private key (with or without 0x prefix)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let signer = LocalSigner::from_private_key("0x...")?;
    /// println!("{}", signer.address());
    /// ```
    pub fn from_private_key(private_key: impl AsRef<str>) -> Result<Self> {
        let key = private_key.as_ref().trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let inner: PrivateKeySigner = key.parse().context("Failed to parse private key")?;

        Ok(Self { inner })
    }

    /// Create a signer with a freshly generated key
    pub fn random() -> Self {
        Self {
            inner: PrivateKeySigner::random(),
        }
    }

    fn sign_envelope(&self, request: &TxRequest) -> Result<(TxEnvelope, Signature)> {
        let to = TxKind::Call(request.to);

        match request.gas {
            GasPricing::Legacy { gas_price } => {
                let mut tx = TxLegacy {
                    chain_id: Some(request.chain_id),
                    nonce: request.nonce,
                    gas_price,
                    gas_limit: request.gas_limit,
                    to,
                    value: request.value,
                    input: request.data.clone(),
                };
                let signature = self
                    .inner
                    .sign_transaction_sync(&mut tx)
                    .context("Failed to sign legacy transaction")?;
                Ok((tx.into_signed(signature).into(), signature))
            }
            GasPricing::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                let mut tx = TxEip1559 {
                    chain_id: request.chain_id,
                    nonce: request.nonce,
                    gas_limit: request.gas_limit,
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                    to,
                    value: request.value,
                    access_list: Default::default(),
                    input: request.data.clone(),
                };
                let signature = self
                    .inner
                    .sign_transaction_sync(&mut tx)
                    .context("Failed to sign EIP-1559 transaction")?;
                Ok((tx.into_signed(signature).into(), signature))
            }
        }
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.inner.address())
            .finish_non_exhaustive()
    }
}

impl TransactionSigner for LocalSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    fn sign_transaction(&self, request: TxRequest) -> Result<SignedTransaction> {
        ensure!(
            request.from == self.address(),
            "Transaction sender {} does not match signer {}",
            request.from,
            self.address()
        );

        let (envelope, signature) = self.sign_envelope(&request)?;
        let hash = *envelope.tx_hash();
        let raw = envelope.encoded_2718().into();

        Ok(SignedTransaction {
            request,
            signature,
            raw,
            hash,
        })
    }

    fn sign_message(&self, message: &str) -> Result<String> {
        let signature = self
            .inner
            .sign_message_sync(message.as_bytes())
            .context("Failed to sign message")?;

        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

/// Recover the address that produced a personal-message signature
pub fn recover_message_signer(message: &str, signature: &str) -> Result<Address> {
    let bytes = hex::decode(signature.trim()).context("Invalid signature hex")?;
    let signature =
        Signature::try_from(bytes.as_slice()).context("Invalid signature bytes")?;

    signature
        .recover_address_from_msg(message)
        .context("Failed to recover signer")
}
