//! Settings profiles for `forkctl node`.

use clap::ValueEnum;
use forkctl_networks::{Environment, ForkConfig, NetworkError};

/// Which network profile a local fork node runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum NodeProfile {
    /// Gas settings of the forked network, one-second interval mining.
    #[default]
    Fork,

    /// The `hardhat` network: 300M block gas limit, zero base fee, automine.
    Hardhat,
}

impl NodeProfile {
    /// Fork settings for this profile.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::MissingForkUrl`] when no upstream endpoint can
    /// be built from `env`.
    pub fn fork_config(self, env: &Environment) -> Result<ForkConfig, NetworkError> {
        match self {
            Self::Fork => ForkConfig::from_env(env),
            Self::Hardhat => ForkConfig::hardhat(env),
        }
    }
}

impl std::fmt::Display for NodeProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fork => write!(f, "fork"),
            Self::Hardhat => write!(f, "hardhat"),
        }
    }
}
