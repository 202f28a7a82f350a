//! Connection bootstrap
//!
//! Builds an [`RpcClient`] for an endpoint and blocks until the node answers
//! `eth_chainId`. Unreachable nodes are retried at a fixed interval, forever
//! unless the caller supplies a shutdown future.

use crate::config::{ChainEndpoint, ChainRegistry, EndpointTarget};
use crate::constants::CONNECT_RETRY_INTERVAL;
use crate::rpc::RpcClient;
use eyre::{bail, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time;

/// Connect to `endpoint`, retrying every second until the node is reachable
pub async fn connect(endpoint: ChainEndpoint) -> Result<RpcClient> {
    connect_until(endpoint, CONNECT_RETRY_INTERVAL, std::future::pending()).await
}

/// Resolve `target` against `registry`, then [`connect`]
pub async fn connect_target(
    registry: &ChainRegistry,
    target: &EndpointTarget,
) -> Result<RpcClient> {
    connect(registry.resolve(target)?).await
}

/// Connect to `endpoint`, retrying every `retry_interval` until the node is
/// reachable or `shutdown` completes
///
/// An invalid RPC URL fails immediately. Cancellation returns an error.
pub async fn connect_until<F>(
    endpoint: ChainEndpoint,
    retry_interval: Duration,
    shutdown: F,
) -> Result<RpcClient>
where
    F: Future<Output = ()>,
{
    let client = RpcClient::new(endpoint)?;
    let endpoint = client.endpoint();

    let probed = probe_until(|| client.probe(), &endpoint.name, retry_interval, shutdown);
    let Some(reported) = probed.await else {
        bail!("Connection to {} cancelled", endpoint.name);
    };

    check_chain_id(endpoint, reported);
    tracing::info!(chain_id = endpoint.chain_id, "Connected to {}", endpoint.name);

    Ok(client)
}

/// Warn when the node reports a chain id other than the configured one.
/// The configured id stays authoritative for signing.
fn check_chain_id(endpoint: &ChainEndpoint, reported: u64) -> bool {
    let matches = reported == endpoint.chain_id;
    if !matches {
        tracing::warn!(
            configured = endpoint.chain_id,
            reported,
            "Node at {} reports a different chain id; signing with the configured one",
            endpoint.name
        );
    }
    matches
}

/// Run `probe` until it succeeds; `None` if `shutdown` fires first
async fn probe_until<P, Fut, F>(
    mut probe: P,
    name: &str,
    retry_interval: Duration,
    shutdown: F,
) -> Option<u64>
where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<u64>>,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut attempt = 1u64;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => return None,
            result = probe() => match result {
                Ok(chain_id) => return Some(chain_id),
                Err(err) => tracing::warn!(
                    attempt,
                    "Failed to connect to {}, retrying in {:?}: {:#}",
                    name,
                    retry_interval,
                    err
                ),
            },
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => return None,
            _ = time::sleep(retry_interval) => {}
        }
        attempt += 1;
    }
}
