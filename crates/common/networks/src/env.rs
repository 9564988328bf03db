//! Environment-provided settings.

use crate::Network;

/// Chain id used by local nodes when no fork chain id is configured.
pub const DEFAULT_LOCAL_CHAIN_ID: u64 = 31337;

/// API keys and fork settings, normally read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Alchemy API key. Preferred over Infura when set.
    pub alchemy_key: Option<String>,
    /// Infura project key.
    pub infura_key: Option<String>,
    /// Network that local nodes fork from.
    pub forking_network: Option<Network>,
    /// Block to pin the fork at. Latest when unset.
    pub forking_block_number: Option<u64>,
    /// Chain id reported by local nodes.
    pub forking_chain_id: Option<u64>,
}

impl Environment {
    /// Alchemy key, treating an empty string as unset.
    #[must_use]
    pub fn alchemy_key(&self) -> Option<&str> {
        self.alchemy_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Infura key, or an empty string when unset.
    #[must_use]
    pub fn infura_key(&self) -> &str {
        self.infura_key.as_deref().unwrap_or_default()
    }

    /// Chain id local nodes run with.
    #[must_use]
    pub fn local_chain_id(&self) -> u64 {
        self.forking_chain_id.unwrap_or(DEFAULT_LOCAL_CHAIN_ID)
    }
}
