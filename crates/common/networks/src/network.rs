//! Supported networks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::NetworkError;

/// A network forkctl knows how to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet.
    Mainnet,
    /// Base mainnet.
    Base,
    /// In-process hardhat network (served on the local node port).
    Hardhat,
    /// A local node, usually a fork started with `forkctl node`.
    #[default]
    Localhost,
}

impl Network {
    /// All supported networks.
    pub const ALL: [Self; 4] = [Self::Mainnet, Self::Base, Self::Hardhat, Self::Localhost];

    /// Lowercase network name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Base => "base",
            Self::Hardhat => "hardhat",
            Self::Localhost => "localhost",
        }
    }

    /// Returns `true` for networks served by a local development node.
    #[must_use]
    pub const fn is_local(self) -> bool {
        matches!(self, Self::Hardhat | Self::Localhost)
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "base" => Ok(Self::Base),
            "hardhat" => Ok(Self::Hardhat),
            "localhost" | "local" => Ok(Self::Localhost),
            other => Err(NetworkError::UnknownNetwork(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("mainnet", Network::Mainnet)]
    #[case("main", Network::Mainnet)]
    #[case("BASE", Network::Base)]
    #[case("hardhat", Network::Hardhat)]
    #[case(" localhost ", Network::Localhost)]
    fn parse_network(#[case] input: &str, #[case] expected: Network) {
        assert_eq!(input.parse::<Network>(), Ok(expected));
    }

    #[test]
    fn parse_unknown_network() {
        assert_eq!(
            "arbitrum".parse::<Network>(),
            Err(NetworkError::UnknownNetwork("arbitrum".into()))
        );
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for network in Network::ALL {
            assert_eq!(network.to_string().parse::<Network>(), Ok(network));
        }
    }

    #[test]
    fn local_networks() {
        assert!(Network::Hardhat.is_local());
        assert!(Network::Localhost.is_local());
        assert!(!Network::Mainnet.is_local());
        assert!(!Network::Base.is_local());
    }

    #[test]
    fn default_is_localhost() {
        assert_eq!(Network::default(), Network::Localhost);
    }
}
