//! Error types for chain operations.

use forkctl_duration::DurationError;

/// Errors that can occur while driving a development chain.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Failed to connect to the RPC endpoint.
    #[error("Failed to connect to chain: {0}")]
    Connection(String),

    /// An RPC call failed.
    #[error("RPC call {method} failed: {message}")]
    Rpc {
        /// JSON-RPC method name.
        method: &'static str,
        /// Error reported by the transport or node.
        message: String,
    },

    /// The node returned no latest block.
    #[error("Latest block not found")]
    BlockNotFound,

    /// A human-readable amount could not be converted to base units.
    #[error("Invalid amount {amount:?}: {reason}")]
    InvalidAmount {
        /// Amount as given by the operator.
        amount: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// A transaction was sent but failed or reverted.
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// A contract call failed.
    #[error("Contract call failed: {0}")]
    Contract(String),

    /// A time interval could not be parsed.
    #[error(transparent)]
    Duration(#[from] DurationError),

    /// Failed to spawn a local node.
    #[error("Failed to spawn anvil: {0}")]
    Spawn(String),
}

impl ChainError {
    /// Wraps a failure of the JSON-RPC `method`.
    pub fn rpc(method: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Rpc { method, message: err.to_string() }
    }
}
