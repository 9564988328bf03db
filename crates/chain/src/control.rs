//! Chain-control capability.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::{BlockTime, ChainError};

/// Administrative access to a development chain.
///
/// Implementations talk to a node that exposes the anvil/hardhat admin RPC
/// namespace. Every method is a single remote call, except the transfer
/// methods which also wait for the transaction receipt.
#[async_trait]
pub trait ChainControl: Send + Sync {
    /// Chain id reported by the node.
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Moves the chain clock forward by `seconds` (`evm_increaseTime`).
    ///
    /// The change becomes visible with the next mined block.
    async fn advance_time(&self, seconds: u64) -> Result<(), ChainError>;

    /// Mines exactly one block (`evm_mine`).
    async fn mine_block(&self) -> Result<(), ChainError>;

    /// Number and timestamp of the latest block.
    async fn latest_block(&self) -> Result<BlockTime, ChainError>;

    /// Allows sending transactions from `account` without its key.
    async fn impersonate(&self, account: Address) -> Result<(), ChainError>;

    /// Reverts [`ChainControl::impersonate`].
    async fn stop_impersonating(&self, account: Address) -> Result<(), ChainError>;

    /// Sends `value` wei from an impersonated `from` to `to`.
    async fn send_eth(&self, from: Address, to: Address, value: U256)
    -> Result<TxHash, ChainError>;

    /// Decimals of the ERC-20 `token`.
    async fn erc20_decimals(&self, token: Address) -> Result<u8, ChainError>;

    /// Transfers `amount` base units of `token` from an impersonated `from`.
    async fn erc20_transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TxHash, ChainError>;
}
