//! JSON-RPC implementation of [`ChainControl`].

use std::time::Duration;

use alloy::{
    eips::BlockNumberOrTag,
    network::ReceiptResponse,
    primitives::{Address, Bytes, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder, ext::AnvilApi},
    rpc::{
        client::RpcClient,
        types::{TransactionInput, TransactionRequest},
    },
    sol,
    sol_types::SolCall,
    transports::http::{Http, reqwest},
};
use async_trait::async_trait;
use forkctl_networks::{GasPrice, NetworkConfig};

use crate::{BlockTime, ChainControl, ChainError};

/// Starts impersonating an account. Served by both hardhat and anvil.
const IMPERSONATE_METHOD: &str = "hardhat_impersonateAccount";
/// Stops impersonating an account. Served by both hardhat and anvil.
const STOP_IMPERSONATING_METHOD: &str = "hardhat_stopImpersonatingAccount";

sol! {
    /// Minimal ERC-20 surface used for balance top-ups.
    #[sol(rpc)]
    interface IERC20 {
        function decimals() external view returns (uint8);
        function transfer(address to, uint256 value) external returns (bool);
    }
}

/// Per-network gas settings applied to every transaction sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOverrides {
    /// Fixed gas limit. Estimated by the node when unset.
    pub gas: Option<u64>,
    /// Fixed legacy gas price in wei. Chosen by the node when unset.
    pub gas_price: Option<u128>,
}

impl TxOverrides {
    /// Overrides carried by a resolved network configuration.
    #[must_use]
    pub fn from_config(config: &NetworkConfig) -> Self {
        let gas_price = match config.gas_price {
            Some(GasPrice::Wei(wei)) => Some(wei as u128),
            Some(GasPrice::Auto) | None => None,
        };
        Self { gas: config.gas, gas_price }
    }

    /// Sets the configured fields on `tx`, leaving the rest untouched.
    #[must_use]
    pub fn apply(&self, mut tx: TransactionRequest) -> TransactionRequest {
        if self.gas.is_some() {
            tx.gas = self.gas;
        }
        if self.gas_price.is_some() {
            tx.gas_price = self.gas_price;
        }
        tx
    }

    /// Ether transfer signed by the node on behalf of `from`.
    #[must_use]
    pub fn eth_transfer(&self, from: Address, to: Address, value: U256) -> TransactionRequest {
        self.apply(TransactionRequest::default().from(from).to(to).value(value))
    }

    /// ERC-20 `transfer(to, amount)` call on `token` sent by `from`.
    #[must_use]
    pub fn erc20_transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TransactionRequest {
        let calldata = IERC20::transferCall { to, value: amount }.abi_encode();
        let tx = TransactionRequest::default()
            .from(from)
            .to(token)
            .input(TransactionInput::new(Bytes::from(calldata)));
        self.apply(tx)
    }
}

/// [`ChainControl`] over an alloy provider connected to anvil or a hardhat node.
///
/// No wallet is attached: transactions are sent with `eth_sendTransaction` and
/// signed by the node, which requires the sender to be impersonated.
pub struct RpcChain<P> {
    /// The alloy provider for RPC calls.
    provider: P,
    /// The RPC URL (for debugging).
    url: String,
    /// Gas settings for outgoing transactions.
    overrides: TxOverrides,
}

impl<P> RpcChain<P> {
    /// Create a new chain handle around an existing provider.
    pub fn new(provider: P, url: impl Into<String>) -> Self {
        Self { provider, url: url.into(), overrides: TxOverrides::default() }
    }

    /// Applies `overrides` to every transaction this handle sends.
    #[must_use]
    pub fn with_overrides(mut self, overrides: TxOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// The RPC URL this handle talks to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Gas settings applied to outgoing transactions.
    #[must_use]
    pub const fn overrides(&self) -> TxOverrides {
        self.overrides
    }
}

impl RpcChain<DynProvider> {
    /// Connect to the node at `url` with the settings of `config`.
    ///
    /// HTTP endpoints get a request timeout of `config.timeout_ms` when one is
    /// configured. Fixed gas settings apply to every transaction sent.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Connection`] if the provider cannot be built.
    pub async fn connect(url: &str, config: &NetworkConfig) -> Result<Self, ChainError> {
        let provider = match (config.timeout_ms, http_url(url)) {
            (Some(timeout_ms), Some(parsed)) => {
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_millis(timeout_ms))
                    .build()
                    .map_err(|e| ChainError::Connection(e.to_string()))?;
                let is_local = is_local_host(&parsed);
                let rpc = RpcClient::new(Http::with_client(client, parsed), is_local);
                ProviderBuilder::new().connect_client(rpc).erased()
            }
            _ => ProviderBuilder::new()
                .connect(url)
                .await
                .map_err(|e| ChainError::Connection(e.to_string()))?
                .erased(),
        };
        let overrides = TxOverrides::from_config(config);
        tracing::debug!(
            url,
            timeout_ms = ?config.timeout_ms,
            gas_price = ?overrides.gas_price,
            "Connected to chain"
        );
        Ok(Self::new(provider, url).with_overrides(overrides))
    }
}

/// Parses `url` if it is an HTTP(S) endpoint.
fn http_url(url: &str) -> Option<reqwest::Url> {
    let parsed = reqwest::Url::parse(url).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(parsed)
}

fn is_local_host(url: &reqwest::Url) -> bool {
    matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"))
}

impl<P> std::fmt::Debug for RpcChain<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChain")
            .field("url", &self.url)
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl<P> RpcChain<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn send_and_confirm(&self, tx: TransactionRequest) -> Result<TxHash, ChainError> {
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::rpc("eth_sendTransaction", e))?
            .get_receipt()
            .await
            .map_err(|e| ChainError::Transaction(e.to_string()))?;
        ensure_success(receipt.status(), receipt.transaction_hash())
    }

    async fn admin_call(&self, method: &'static str, account: Address) -> Result<(), ChainError> {
        self.provider
            .raw_request::<_, serde_json::Value>(method.into(), (account,))
            .await
            .map_err(|e| ChainError::rpc(method, e))?;
        Ok(())
    }
}

fn ensure_success(status: bool, hash: TxHash) -> Result<TxHash, ChainError> {
    if status { Ok(hash) } else { Err(ChainError::Transaction(format!("{hash} reverted"))) }
}

#[async_trait]
impl<P> ChainControl for RpcChain<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider.get_chain_id().await.map_err(|e| ChainError::rpc("eth_chainId", e))
    }

    async fn advance_time(&self, seconds: u64) -> Result<(), ChainError> {
        self.provider
            .anvil_increase_time(seconds)
            .await
            .map_err(|e| ChainError::rpc("evm_increaseTime", e))?;
        tracing::debug!(seconds, "Increased chain time");
        Ok(())
    }

    async fn mine_block(&self) -> Result<(), ChainError> {
        self.provider.evm_mine(None).await.map_err(|e| ChainError::rpc("evm_mine", e))?;
        tracing::debug!("Mined block");
        Ok(())
    }

    async fn latest_block(&self) -> Result<BlockTime, ChainError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| ChainError::rpc("eth_getBlockByNumber", e))?
            .ok_or(ChainError::BlockNotFound)?;
        Ok(BlockTime { number: block.header.number, timestamp: block.header.timestamp })
    }

    async fn impersonate(&self, account: Address) -> Result<(), ChainError> {
        self.admin_call(IMPERSONATE_METHOD, account).await?;
        tracing::debug!(%account, "Impersonating account");
        Ok(())
    }

    async fn stop_impersonating(&self, account: Address) -> Result<(), ChainError> {
        self.admin_call(STOP_IMPERSONATING_METHOD, account).await?;
        tracing::debug!(%account, "Stopped impersonating account");
        Ok(())
    }

    async fn send_eth(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<TxHash, ChainError> {
        self.send_and_confirm(self.overrides.eth_transfer(from, to, value)).await
    }

    async fn erc20_decimals(&self, token: Address) -> Result<u8, ChainError> {
        IERC20::new(token, self.provider.clone())
            .decimals()
            .call()
            .await
            .map_err(|e| ChainError::Contract(format!("decimals() on {token}: {e}")))
    }

    async fn erc20_transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<TxHash, ChainError> {
        let tx = self.overrides.erc20_transfer(token, from, to, amount);
        self.send_and_confirm(tx).await.map_err(|e| match e {
            ChainError::Rpc { message, .. } => {
                ChainError::Contract(format!("transfer() on {token}: {message}"))
            }
            other => other,
        })
    }
}
