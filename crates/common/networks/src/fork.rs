//! Local fork settings.

use serde::Serialize;

use crate::{Environment, Network, NetworkConfig, NetworkError, config::rpc_url};

/// Mnemonic of the pre-funded development accounts.
pub const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Interval mining for a forked node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningConfig {
    /// Mine a block for every transaction.
    pub auto: bool,
    /// Interval between mined blocks in milliseconds.
    pub interval_ms: u64,
}

impl MiningConfig {
    /// Block time in whole seconds, never less than one.
    #[must_use]
    pub const fn block_time_secs(&self) -> u64 {
        let secs = self.interval_ms / 1000;
        if secs == 0 { 1 } else { secs }
    }
}

/// How to start a local node that forks an upstream network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkConfig {
    /// Gas settings of the forked network.
    pub settings: NetworkConfig,
    /// Upstream RPC endpoint.
    pub fork_url: String,
    /// Block to fork at. Latest when unset.
    pub fork_block_number: Option<u64>,
    /// Chain id the local node reports.
    pub chain_id: u64,
    /// Mnemonic for the local accounts.
    pub mnemonic: &'static str,
    /// Interval mining, or `None` to mine on every transaction.
    pub mining: Option<MiningConfig>,
}

impl ForkConfig {
    /// Fork of `network` with one-second interval mining.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingForkUrl`] when `network` is local or no
    /// API key is available to build an upstream URL.
    pub fn fork_of(network: Network, env: &Environment) -> Result<Self, NetworkError> {
        Ok(Self {
            settings: NetworkConfig::base(network, env),
            fork_url: upstream_url(network, env)?,
            fork_block_number: env.forking_block_number,
            chain_id: env.local_chain_id(),
            mnemonic: TEST_MNEMONIC,
            mining: Some(MiningConfig { auto: false, interval_ms: 1000 }),
        })
    }

    /// Fork of the network named by `env.forking_network`, mainnet by default.
    ///
    /// # Errors
    ///
    /// See [`ForkConfig::fork_of`].
    pub fn from_env(env: &Environment) -> Result<Self, NetworkError> {
        Self::fork_of(env.forking_network.unwrap_or(Network::Mainnet), env)
    }

    /// The `hardhat` network profile: 300M block gas limit, zero base fee and
    /// gas price, automine.
    ///
    /// Forks the network named by `env.forking_network`, mainnet by default.
    ///
    /// # Errors
    ///
    /// See [`ForkConfig::fork_of`].
    pub fn hardhat(env: &Environment) -> Result<Self, NetworkError> {
        let upstream = env.forking_network.unwrap_or(Network::Mainnet);
        Ok(Self {
            settings: NetworkConfig::base(Network::Hardhat, env),
            fork_url: upstream_url(upstream, env)?,
            fork_block_number: env.forking_block_number,
            chain_id: env.local_chain_id(),
            mnemonic: TEST_MNEMONIC,
            mining: None,
        })
    }
}

/// Endpoint a local node can fork `network` from.
///
/// Mainnet has no public fallback and needs an Alchemy or Infura key.
fn upstream_url(network: Network, env: &Environment) -> Result<String, NetworkError> {
    let keyless_mainnet =
        network == Network::Mainnet && env.alchemy_key().is_none() && env.infura_key().is_empty();
    if network.is_local() || keyless_mainnet {
        return Err(NetworkError::MissingForkUrl(network.to_string()));
    }
    Ok(rpc_url(network, env))
}
