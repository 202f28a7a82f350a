//! EvmClient - main entry point for the SDK

use crate::config::ChainEndpoint;
use crate::connection::connect;
use crate::constants::ERC20_BALANCE_OF;
use crate::encoding::{decode_uint, encode_call, encode_call_values};
use crate::lifecycle::submit;
use crate::nonce::resolve_nonce;
use crate::rpc::RpcClient;
use crate::signer::TransactionSigner;
use crate::types::{Submission, TxParams, WaitMode};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, Bytes, U256};
use eyre::{Context, Result};

/// Client bundling a connected node with the key that signs for it
pub struct EvmClient<S: TransactionSigner> {
    signer: S,
    rpc: RpcClient,
}

impl<S: TransactionSigner> EvmClient<S> {
    /// Wrap an existing connection
    pub fn new(rpc: RpcClient, signer: S) -> Self {
        Self { signer, rpc }
    }

    /// Connect to `endpoint` (retrying until reachable) and wrap the result
    pub async fn connect(endpoint: ChainEndpoint, signer: S) -> Result<Self> {
        let rpc = connect(endpoint).await?;
        Ok(Self::new(rpc, signer))
    }

    /// Get the signer's address
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the signer
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Get the underlying node connection
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Get the endpoint configuration
    pub fn endpoint(&self) -> &ChainEndpoint {
        self.rpc.endpoint()
    }

    /// Chain ID transactions are signed for
    pub fn chain_id(&self) -> u64 {
        self.rpc.chain_id()
    }

    // ========== Transactions ==========

    /// Sign and broadcast a transaction, then wait according to `mode`
    pub async fn send_transaction(&self, params: TxParams, mode: &WaitMode) -> Result<Submission> {
        submit(&self.rpc, &self.signer, params, mode).await
    }

    /// Transfer `amount` (raw token units) of `token` to `receiver`
    pub async fn send_erc20(
        &self,
        token: Address,
        receiver: Address,
        amount: U256,
        mode: &WaitMode,
    ) -> Result<Submission> {
        let params = TxParams::erc20_transfer(token, receiver, amount);
        self.send_transaction(params, mode)
            .await
            .context("Failed to send ERC-20 transfer")
    }

    /// Sign a text message with the EIP-191 prefix
    pub fn sign_message(&self, message: &str) -> Result<String> {
        self.signer.sign_message(message)
    }

    // ========== Reads ==========

    /// `eth_call` built from a signature and optional string arguments
    ///
    /// # Arguments
    ///
    /// * `contract` - Contract to call
    /// * `signature` - Function signature, e.g. `"balanceOf(address)"`
    /// * `types` / `args` - Canonical parameter types and their values; when
    ///   either is `None` only the selector is sent
    ///
    /// # Returns
    ///
    /// Raw return data, undecoded
    pub async fn read_raw_contract(
        &self,
        contract: Address,
        signature: &str,
        types: Option<&[&str]>,
        args: Option<&[&str]>,
    ) -> Result<Bytes> {
        let data = encode_call(signature, types, args)?;
        self.rpc
            .call(contract, data)
            .await
            .with_context(|| format!("Failed to call {} on {}", signature, contract))
    }

    /// ERC-20 balance of `owner` (defaults to the signer) in raw token units
    pub async fn erc20_balance(&self, token: Address, owner: Option<Address>) -> Result<U256> {
        let owner = owner.unwrap_or_else(|| self.address());
        let data = encode_call_values(ERC20_BALANCE_OF, &[DynSolValue::Address(owner)]);

        let result = self
            .rpc
            .call(token, data)
            .await
            .context("Failed to call balanceOf")?;

        decode_uint(&result).context("Failed to decode balance")
    }

    /// Native balance of `owner` (defaults to the signer) in wei
    pub async fn eth_balance(&self, owner: Option<Address>) -> Result<U256> {
        let owner = owner.unwrap_or_else(|| self.address());
        self.rpc.balance(owner).await
    }

    /// Next usable nonce for the signer given the caller's own estimate
    pub async fn nonce(&self, estimate: u64) -> Result<u64> {
        resolve_nonce(&self.rpc, self.address(), estimate).await
    }
}
