//! Send one transaction and wait for it
//!
//! Run with: cargo run --example send_transaction
//!
//! Requires RPC_URL, CHAIN_ID, PRIVATE_KEY and TO environment variables.
//! Optional: AMOUNT (wei, or raw token units with TOKEN), TOKEN (ERC-20
//! contract address), ASYNC=1 to return right after broadcast.

use alloy::primitives::{Address, U256};
use eyre::Context;
use txpilot::{
    connect_until, constants::CONNECT_RETRY_INTERVAL, ChainEndpoint, ConfirmationOutcome,
    EvmClient, LocalSigner, TxParams, WaitMode,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let endpoint = ChainEndpoint::from_env()?;
    let private_key = std::env::var("PRIVATE_KEY").context("PRIVATE_KEY must be set")?;
    let to: Address = std::env::var("TO")
        .context("TO must be set")?
        .parse()
        .context("TO must be an address")?;
    let amount: U256 = match std::env::var("AMOUNT") {
        Ok(amount) => amount.parse().context("AMOUNT must be an integer")?,
        Err(_) => U256::ZERO,
    };
    let token: Option<Address> = match std::env::var("TOKEN") {
        Ok(token) => Some(token.parse().context("TOKEN must be an address")?),
        Err(_) => None,
    };
    let mode = match std::env::var("ASYNC").as_deref() {
        Ok("1") => WaitMode::Broadcast,
        _ => WaitMode::default(),
    };

    // Ctrl-C aborts the connection retry loop
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl-C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };
    let rpc = connect_until(endpoint, CONNECT_RETRY_INTERVAL, shutdown).await?;
    let client = EvmClient::new(rpc, LocalSigner::from_private_key(&private_key)?);

    println!("Sender:  {}", client.address());
    println!("Balance: {} wei", client.eth_balance(None).await?);

    let submission = match token {
        Some(token) => client.send_erc20(token, to, amount, &mode).await?,
        None => {
            client
                .send_transaction(TxParams::new(to).with_value(amount), &mode)
                .await?
        }
    };

    println!("Hash:    {}", submission.tx_hash);
    println!("Nonce:   {}", submission.nonce);
    match submission.outcome {
        None => println!("Broadcast only, not waiting for a receipt"),
        Some(ConfirmationOutcome::Confirmed(receipt)) => println!(
            "Confirmed in block {:?}, gas used {}",
            receipt.block_number, receipt.gas_used
        ),
        Some(ConfirmationOutcome::Reverted(receipt)) => {
            println!("Reverted in block {:?}", receipt.block_number)
        }
        Some(ConfirmationOutcome::TimedOut) => println!("Timed out waiting for a receipt"),
        Some(ConfirmationOutcome::Errored(err)) => println!("Gave up polling: {:#}", err),
    }

    Ok(())
}
