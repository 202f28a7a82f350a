//! Transaction lifecycle: resolve, sign, broadcast and optionally confirm

pub mod confirm;

pub use confirm::{classify_poll_error, wait_for_confirmation, ConfirmPolicy, PollFault};

use crate::nonce::resolve_nonce;
use crate::rpc::Node;
use crate::signer::TransactionSigner;
use crate::types::{GasPricing, Submission, TxParams, TxRequest, WaitMode};
use eyre::{Context, Result};

/// Submit a transaction from `signer`'s address
///
/// Nonce, chain id and (unless the caller set one) a legacy gas price are
/// taken from the node. Errors before the node returns a hash are propagated;
/// once broadcast, the result is always a [`Submission`] whose outcome
/// describes what happened to the transaction.
pub async fn submit<N, S>(
    node: &N,
    signer: &S,
    params: TxParams,
    mode: &WaitMode,
) -> Result<Submission>
where
    N: Node,
    S: TransactionSigner + ?Sized,
{
    let from = signer.address();
    let nonce = resolve_nonce(node, from, params.nonce).await?;

    let gas = match params.gas {
        Some(gas) => gas,
        None => GasPricing::legacy(
            node.gas_price()
                .await
                .context("Failed to fetch default gas price")?,
        ),
    };

    let request = TxRequest {
        from,
        to: params.to,
        value: params.value,
        data: params.data,
        gas_limit: params.gas_limit,
        gas,
        chain_id: node.chain_id(),
        nonce,
    };

    let signed = signer
        .sign_transaction(request)
        .context("Failed to sign transaction")?;

    let tx_hash = node
        .send_raw_transaction(&signed.raw)
        .await
        .context("Failed to broadcast transaction")?;

    if tx_hash != signed.hash {
        tracing::warn!(
            "Node reported hash {} but the signed transaction hashes to {}",
            tx_hash,
            signed.hash
        );
    }
    tracing::info!(%from, nonce, "Transaction submitted: {}", tx_hash);

    let outcome = match mode {
        WaitMode::Broadcast => None,
        WaitMode::Confirm(policy) => {
            tracing::info!("Awaiting confirmation of {} (timeout {:?})", tx_hash, policy.timeout);
            Some(wait_for_confirmation(node, tx_hash, policy).await)
        }
    };

    Ok(Submission {
        tx_hash,
        nonce,
        outcome,
    })
}
