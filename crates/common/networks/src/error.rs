//! Network configuration errors.

use thiserror::Error;

/// Errors raised while resolving network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The network name is not one of the supported networks.
    #[error("Unknown network: {0} (expected one of mainnet, base, hardhat, localhost)")]
    UnknownNetwork(String),

    /// A fork was requested without an upstream URL.
    #[error("No fork URL for network {0}")]
    MissingForkUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_network_display() {
        let err = NetworkError::UnknownNetwork("sepolia".into());
        assert_eq!(
            err.to_string(),
            "Unknown network: sepolia (expected one of mainnet, base, hardhat, localhost)"
        );
    }

    #[test]
    fn missing_fork_url_display() {
        let err = NetworkError::MissingForkUrl("base".into());
        assert_eq!(err.to_string(), "No fork URL for network base");
    }
}
