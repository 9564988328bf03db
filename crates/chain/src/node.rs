//! Local fork node.

use alloy::node_bindings::{Anvil, AnvilInstance};
use forkctl_networks::ForkConfig;

use crate::ChainError;

/// Startup timeout for a forking anvil, which fetches upstream state first.
const FORK_STARTUP_TIMEOUT_MS: u64 = 60_000;

/// A running anvil process forking an upstream network.
///
/// When this struct is dropped, the anvil process is terminated.
pub struct ForkNode {
    /// The running anvil instance.
    anvil: AnvilInstance,
    /// The endpoint URL.
    endpoint_url: String,
}

impl ForkNode {
    /// Spawn anvil on `port` with the settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Spawn`] if anvil is missing or fails to start.
    pub fn spawn(config: &ForkConfig, port: u16) -> Result<Self, ChainError> {
        tracing::info!(
            fork_url = %redact(&config.fork_url),
            block = ?config.fork_block_number,
            chain_id = config.chain_id,
            port,
            "Spawning fork node"
        );

        let anvil = Self::builder(config, port)
            .try_spawn()
            .map_err(|e| ChainError::Spawn(e.to_string()))?;
        let endpoint_url = anvil.endpoint();

        tracing::info!(endpoint = %endpoint_url, "Fork node started");
        Ok(Self { anvil, endpoint_url })
    }

    fn builder(config: &ForkConfig, port: u16) -> Anvil {
        let mut builder = Anvil::new()
            .port(port)
            .fork(config.fork_url.clone())
            .chain_id(config.chain_id)
            .mnemonic(config.mnemonic)
            .timeout(FORK_STARTUP_TIMEOUT_MS);

        if let Some(block) = config.fork_block_number {
            builder = builder.fork_block_number(block);
        }
        if let Some(mining) = config.mining.filter(|m| !m.auto) {
            builder = builder.block_time(mining.block_time_secs());
        }
        builder.args(gas_args(config))
    }

    /// Get the RPC endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint_url
    }

    /// Addresses of the pre-funded development accounts.
    #[must_use]
    pub fn accounts(&self) -> &[alloy::primitives::Address] {
        self.anvil.addresses()
    }
}

impl std::fmt::Debug for ForkNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForkNode").field("endpoint", &self.endpoint_url).finish()
    }
}

/// Anvil flags for the block gas limit and initial base fee of `config`.
fn gas_args(config: &ForkConfig) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(limit) = config.settings.block_gas_limit {
        args.extend(["--gas-limit".to_string(), limit.to_string()]);
    }
    if let Some(base_fee) = config.settings.initial_base_fee_per_gas {
        args.extend(["--base-fee".to_string(), base_fee.to_string()]);
    }
    args
}

/// Strips the API key path segment from provider URLs before logging.
fn redact(url: &str) -> String {
    match url.find("/v2/").or_else(|| url.find("/v3/")) {
        Some(idx) => format!("{}/***", &url[..idx + 3]),
        None => url.to_string(),
    }
}
