//! Per-network RPC and gas tables.

use serde::{Serialize, Serializer};

use crate::{Environment, Network};

/// One gwei in wei.
pub const GWEI: u64 = 1_000_000_000;

/// Local RPC endpoint shared by the hardhat and localhost networks.
const LOCAL_RPC_URL: &str = "http://localhost:8545";

/// Gas price policy for a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPrice {
    /// Let the node suggest a price.
    Auto,
    /// Fixed price in wei.
    Wei(u64),
}

impl Serialize for GasPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Wei(wei) => serializer.serialize_u64(*wei),
        }
    }
}

/// Resolved settings for talking to one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Network these settings describe.
    pub network: Network,
    /// RPC endpoint.
    pub url: String,
    /// Expected chain id.
    pub chain_id: u64,
    /// Fixed gas limit per transaction, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    /// Gas price policy, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<GasPrice>,
    /// Block gas limit for local nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_gas_limit: Option<u64>,
    /// RPC timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Base fee of the first local block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_base_fee_per_gas: Option<u64>,
}

impl NetworkConfig {
    /// Settings for `network`, with local networks inheriting the gas table of
    /// `env.forking_network` when set.
    ///
    /// The URL and chain id always belong to `network` itself.
    #[must_use]
    pub fn resolve(network: Network, env: &Environment) -> Self {
        let gas_source = match env.forking_network {
            Some(fork) if network.is_local() => fork,
            _ => network,
        };
        Self {
            network,
            url: rpc_url(network, env),
            chain_id: chain_id(network, env),
            ..Self::base(gas_source, env)
        }
    }

    /// Gas and limit settings for `network` alone.
    #[must_use]
    pub fn base(network: Network, env: &Environment) -> Self {
        Self {
            network,
            url: rpc_url(network, env),
            chain_id: chain_id(network, env),
            gas: None,
            gas_price: gas_price(network),
            block_gas_limit: block_gas_limit(network),
            timeout_ms: timeout_ms(network),
            initial_base_fee_per_gas: initial_base_fee_per_gas(network),
        }
    }

    /// Settings for every supported network.
    #[must_use]
    pub fn all(env: &Environment) -> Vec<Self> {
        Network::ALL.into_iter().map(|network| Self::resolve(network, env)).collect()
    }
}

/// RPC endpoint for `network`.
///
/// Remote networks use Alchemy when a key is configured and fall back to a
/// public or Infura endpoint otherwise.
pub(crate) fn rpc_url(network: Network, env: &Environment) -> String {
    match (network, env.alchemy_key()) {
        (Network::Base, Some(key)) => format!("https://base-mainnet.g.alchemy.com/v2/{key}"),
        (Network::Base, None) => "https://base.llamarpc.com".to_string(),
        (Network::Mainnet, Some(key)) => format!("https://eth-mainnet.g.alchemy.com/v2/{key}"),
        (Network::Mainnet, None) => format!("https://mainnet.infura.io/v3/{}", env.infura_key()),
        (Network::Hardhat | Network::Localhost, _) => LOCAL_RPC_URL.to_string(),
    }
}

fn chain_id(network: Network, env: &Environment) -> u64 {
    match network {
        Network::Mainnet => 1,
        Network::Base => 8453,
        Network::Hardhat | Network::Localhost => env.local_chain_id(),
    }
}

const fn gas_price(network: Network) -> Option<GasPrice> {
    match network {
        Network::Mainnet | Network::Base => Some(GasPrice::Auto),
        Network::Hardhat => Some(GasPrice::Wei(0)),
        Network::Localhost => Some(GasPrice::Wei(70 * GWEI)),
    }
}

const fn block_gas_limit(network: Network) -> Option<u64> {
    match network {
        Network::Hardhat => Some(300_000_000),
        _ => None,
    }
}

const fn timeout_ms(network: Network) -> Option<u64> {
    match network {
        Network::Localhost => Some(999_999),
        _ => None,
    }
}

const fn initial_base_fee_per_gas(network: Network) -> Option<u64> {
    match network {
        Network::Hardhat => Some(0),
        _ => None,
    }
}
