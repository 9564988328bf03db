//! Operator tasks built on [`ChainControl`].
//!
//! Each task is a short, strictly sequential protocol. A failing step aborts
//! the task and its error is returned unchanged.

use std::future::Future;

use alloy::primitives::{
    Address, TxHash, U256,
    utils::{parse_ether, parse_units},
};
use forkctl_duration::parse_duration_args;

use crate::{BlockTime, ChainControl, ChainError};

/// Advances the chain clock by `seconds` and mines one block.
///
/// Runs `evm_increaseTime`, then `evm_mine`, then reads the latest block, and
/// returns the new block's time.
///
/// # Errors
///
/// Returns the first failing step's error; later steps are not attempted.
pub async fn add_time<C>(chain: &C, seconds: u64) -> Result<BlockTime, ChainError>
where
    C: ChainControl + ?Sized,
{
    tracing::info!(seconds, "Advancing chain time");
    chain.advance_time(seconds).await?;
    chain.mine_block().await?;
    let block = chain.latest_block().await?;
    tracing::info!(number = block.number, timestamp = block.timestamp, "Mined block");
    Ok(block)
}

/// Parses `words` as a duration, then connects and runs [`add_time`].
///
/// `connect` is only awaited once the duration is known to be valid, so a
/// malformed interval never reaches the node.
///
/// # Errors
///
/// Returns [`ChainError::Duration`] for an invalid interval, otherwise the
/// connection error or the first failing step of [`add_time`].
pub async fn add_time_with<S, C, F, Fut>(
    words: &[S],
    connect: F,
) -> Result<BlockTime, ChainError>
where
    S: AsRef<str>,
    C: ChainControl,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<C, ChainError>>,
{
    let seconds = parse_duration_args(words)?;
    let chain = connect().await?;
    add_time(&chain, seconds).await
}

/// Reads the latest block's time.
///
/// # Errors
///
/// Propagates the RPC error.
pub async fn now<C>(chain: &C) -> Result<BlockTime, ChainError>
where
    C: ChainControl + ?Sized,
{
    chain.latest_block().await
}

/// Mines a single block.
///
/// # Errors
///
/// Propagates the RPC error.
pub async fn mine<C>(chain: &C) -> Result<(), ChainError>
where
    C: ChainControl + ?Sized,
{
    chain.mine_block().await
}

/// ERC-20 top-up from a holder account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    /// Token contract.
    pub token: Address,
    /// Account that currently holds the tokens.
    pub holder: Address,
    /// Account to credit.
    pub recipient: Address,
    /// Human-readable amount, scaled by the token's decimals (e.g. `1000`).
    pub amount: String,
}

/// Ether top-up from a holder account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthTransfer {
    /// Account that currently holds the ether.
    pub holder: Address,
    /// Account to credit.
    pub recipient: Address,
    /// Ether amount (e.g. `0.5`).
    pub amount: String,
}

/// Transfers tokens out of an impersonated holder.
///
/// The holder is released even when the transfer fails.
///
/// # Errors
///
/// Returns [`ChainError::InvalidAmount`] if `amount` cannot be scaled by the
/// token's decimals, or the first RPC error encountered.
pub async fn add_balance<C>(chain: &C, transfer: &TokenTransfer) -> Result<TxHash, ChainError>
where
    C: ChainControl + ?Sized,
{
    chain.impersonate(transfer.holder).await?;
    let result = async {
        let decimals = chain.erc20_decimals(transfer.token).await?;
        let amount = token_amount(&transfer.amount, decimals)?;
        tracing::info!(
            token = %transfer.token,
            holder = %transfer.holder,
            recipient = %transfer.recipient,
            %amount,
            decimals,
            "Transferring tokens"
        );
        chain.erc20_transfer(transfer.token, transfer.holder, transfer.recipient, amount).await
    }
    .await;
    release(chain, transfer.holder, result).await
}

/// Sends ether out of an impersonated holder.
///
/// The holder is released even when the transfer fails.
///
/// # Errors
///
/// Returns [`ChainError::InvalidAmount`] if `amount` is not a valid ether
/// value, or the first RPC error encountered.
pub async fn add_balance_eth<C>(chain: &C, transfer: &EthTransfer) -> Result<TxHash, ChainError>
where
    C: ChainControl + ?Sized,
{
    let value = ether_amount(&transfer.amount)?;
    chain.impersonate(transfer.holder).await?;
    tracing::info!(
        holder = %transfer.holder,
        recipient = %transfer.recipient,
        %value,
        "Transferring ether"
    );
    let result = chain.send_eth(transfer.holder, transfer.recipient, value).await;
    release(chain, transfer.holder, result).await
}

/// Stops impersonating `account`, keeping the first error.
async fn release<C, T>(
    chain: &C,
    account: Address,
    result: Result<T, ChainError>,
) -> Result<T, ChainError>
where
    C: ChainControl + ?Sized,
{
    let stopped = chain.stop_impersonating(account).await;
    match (result, stopped) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), stopped) => {
            if let Err(stop_err) = stopped {
                tracing::warn!(%account, error = %stop_err, "Failed to stop impersonating");
            }
            Err(e)
        }
    }
}

/// Scales a human-readable token amount by `decimals`.
pub(crate) fn token_amount(amount: &str, decimals: u8) -> Result<U256, ChainError> {
    let amount = non_negative(amount)?;
    parse_units(amount, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| ChainError::InvalidAmount { amount: amount.to_string(), reason: e.to_string() })
}

/// Converts an ether amount to wei.
pub(crate) fn ether_amount(amount: &str) -> Result<U256, ChainError> {
    let amount = non_negative(amount)?;
    parse_ether(amount)
        .map_err(|e| ChainError::InvalidAmount { amount: amount.to_string(), reason: e.to_string() })
}

fn non_negative(amount: &str) -> Result<&str, ChainError> {
    let amount = amount.trim();
    if amount.starts_with('-') {
        return Err(ChainError::InvalidAmount {
            amount: amount.to_string(),
            reason: "amount must not be negative".to_string(),
        });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    };

    use async_trait::async_trait;
    use rstest::rstest;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        AdvanceTime(u64),
        Mine,
        Latest,
        Impersonate(Address),
        StopImpersonating(Address),
        SendEth(Address, Address, U256),
        Decimals(Address),
        Transfer(Address, Address, Address, U256),
    }

    /// Records calls in order and fails the first call matching `fail_on`.
    #[derive(Default, Clone)]
    struct RecordingChain {
        calls: Arc<Mutex<Vec<Call>>>,
        fail_on: Option<fn(&Call) -> bool>,
        timestamp: u64,
        decimals: u8,
    }

    impl RecordingChain {
        fn failing(fail_on: fn(&Call) -> bool) -> Self {
            Self { fail_on: Some(fail_on), ..Default::default() }
        }

        fn record(&self, call: Call) -> Result<(), ChainError> {
            let fail = self.fail_on.is_some_and(|f| f(&call));
            self.calls.lock().unwrap().push(call);
            if fail { Err(ChainError::rpc("mock", "injected failure")) } else { Ok(()) }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChainControl for RecordingChain {
        async fn chain_id(&self) -> Result<u64, ChainError> {
            Ok(31337)
        }

        async fn advance_time(&self, seconds: u64) -> Result<(), ChainError> {
            self.record(Call::AdvanceTime(seconds))
        }

        async fn mine_block(&self) -> Result<(), ChainError> {
            self.record(Call::Mine)
        }

        async fn latest_block(&self) -> Result<BlockTime, ChainError> {
            self.record(Call::Latest)?;
            Ok(BlockTime { number: 7, timestamp: self.timestamp })
        }

        async fn impersonate(&self, account: Address) -> Result<(), ChainError> {
            self.record(Call::Impersonate(account))
        }

        async fn stop_impersonating(&self, account: Address) -> Result<(), ChainError> {
            self.record(Call::StopImpersonating(account))
        }

        async fn send_eth(
            &self,
            from: Address,
            to: Address,
            value: U256,
        ) -> Result<TxHash, ChainError> {
            self.record(Call::SendEth(from, to, value))?;
            Ok(TxHash::repeat_byte(0xee))
        }

        async fn erc20_decimals(&self, token: Address) -> Result<u8, ChainError> {
            self.record(Call::Decimals(token))?;
            Ok(self.decimals)
        }

        async fn erc20_transfer(
            &self,
            token: Address,
            from: Address,
            to: Address,
            amount: U256,
        ) -> Result<TxHash, ChainError> {
            self.record(Call::Transfer(token, from, to, amount))?;
            Ok(TxHash::repeat_byte(0x20))
        }
    }

    const TOKEN: Address = Address::repeat_byte(0x01);
    const HOLDER: Address = Address::repeat_byte(0x02);
    const RECIPIENT: Address = Address::repeat_byte(0x03);

    fn token_transfer(amount: &str) -> TokenTransfer {
        TokenTransfer { token: TOKEN, holder: HOLDER, recipient: RECIPIENT, amount: amount.into() }
    }

    fn eth_transfer(amount: &str) -> EthTransfer {
        EthTransfer { holder: HOLDER, recipient: RECIPIENT, amount: amount.into() }
    }

    #[tokio::test]
    async fn add_time_runs_advance_mine_latest_in_order() {
        let chain = RecordingChain { timestamp: 1_700_005_400, ..Default::default() };
        let block = add_time(&chain, 5_400).await.unwrap();
        assert_eq!(block, BlockTime { number: 7, timestamp: 1_700_005_400 });
        assert_eq!(chain.calls(), vec![Call::AdvanceTime(5_400), Call::Mine, Call::Latest]);
    }

    #[tokio::test]
    async fn add_time_stops_when_advance_fails() {
        let chain = RecordingChain::failing(|c| matches!(c, Call::AdvanceTime(_)));
        assert!(add_time(&chain, 60).await.is_err());
        assert_eq!(chain.calls(), vec![Call::AdvanceTime(60)]);
    }

    #[tokio::test]
    async fn add_time_stops_when_mine_fails() {
        let chain = RecordingChain::failing(|c| *c == Call::Mine);
        let err = add_time(&chain, 60).await.unwrap_err();
        assert!(matches!(err, ChainError::Rpc { method: "mock", .. }));
        assert_eq!(chain.calls(), vec![Call::AdvanceTime(60), Call::Mine]);
    }

    #[tokio::test]
    async fn add_time_works_through_trait_object() {
        let chain: Box<dyn ChainControl> = Box::new(RecordingChain::default());
        add_time(chain.as_ref(), 1).await.unwrap();
    }

    #[tokio::test]
    async fn add_time_with_joins_words_and_runs_pipeline() {
        let chain = RecordingChain::default();
        let handle = chain.clone();
        add_time_with(&["1h", "30m"], || async move { Ok(handle) }).await.unwrap();
        assert_eq!(chain.calls(), vec![Call::AdvanceTime(5_400), Call::Mine, Call::Latest]);
    }

    #[rstest]
    #[case(&["abc"])]
    #[case(&["0h"])]
    #[case(&["1", "x"])]
    #[tokio::test]
    async fn add_time_with_rejects_bad_interval_before_connecting(#[case] words: &[&str]) {
        let chain = RecordingChain::default();
        let handle = chain.clone();
        let connected = AtomicBool::new(false);

        let err = add_time_with(words, || async {
            connected.store(true, Ordering::SeqCst);
            Ok(handle)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ChainError::Duration(_)));
        assert_eq!(err.to_string(), "Invalid time format. Example: 1h30m, 2d, 45m");
        assert!(!connected.load(Ordering::SeqCst));
        assert!(chain.calls().is_empty());
    }

    #[tokio::test]
    async fn add_time_with_propagates_connection_error() {
        let err = add_time_with(&["1h"], || async {
            Err::<RecordingChain, _>(ChainError::Connection("refused".into()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ChainError::Connection(_)));
    }

    #[tokio::test]
    async fn now_and_mine_are_single_calls() {
        let chain = RecordingChain::default();
        now(&chain).await.unwrap();
        mine(&chain).await.unwrap();
        assert_eq!(chain.calls(), vec![Call::Latest, Call::Mine]);
    }

    #[tokio::test]
    async fn add_balance_scales_by_token_decimals() {
        let chain = RecordingChain { decimals: 6, ..Default::default() };
        let hash = add_balance(&chain, &token_transfer("1000")).await.unwrap();
        assert_eq!(hash, TxHash::repeat_byte(0x20));
        assert_eq!(
            chain.calls(),
            vec![
                Call::Impersonate(HOLDER),
                Call::Decimals(TOKEN),
                Call::Transfer(TOKEN, HOLDER, RECIPIENT, U256::from(1_000_000_000u64)),
                Call::StopImpersonating(HOLDER),
            ]
        );
    }

    #[tokio::test]
    async fn add_balance_releases_holder_when_transfer_fails() {
        let chain = RecordingChain::failing(|c| matches!(c, Call::Transfer(..)));
        let err = add_balance(&chain, &token_transfer("1")).await.unwrap_err();
        assert!(matches!(err, ChainError::Rpc { .. }));
        assert_eq!(chain.calls().last(), Some(&Call::StopImpersonating(HOLDER)));
    }

    #[tokio::test]
    async fn add_balance_releases_holder_when_amount_is_invalid() {
        let chain = RecordingChain { decimals: 18, ..Default::default() };
        let err = add_balance(&chain, &token_transfer("lots")).await.unwrap_err();
        assert!(matches!(err, ChainError::InvalidAmount { .. }));
        assert_eq!(
            chain.calls(),
            vec![
                Call::Impersonate(HOLDER),
                Call::Decimals(TOKEN),
                Call::StopImpersonating(HOLDER),
            ]
        );
    }

    #[tokio::test]
    async fn add_balance_skips_transfer_when_impersonation_fails() {
        let chain = RecordingChain::failing(|c| matches!(c, Call::Impersonate(_)));
        assert!(add_balance(&chain, &token_transfer("1")).await.is_err());
        assert_eq!(chain.calls(), vec![Call::Impersonate(HOLDER)]);
    }

    #[tokio::test]
    async fn add_balance_reports_release_failure() {
        let chain = RecordingChain::failing(|c| matches!(c, Call::StopImpersonating(_)));
        assert!(add_balance(&chain, &token_transfer("1")).await.is_err());
    }

    #[tokio::test]
    async fn add_balance_eth_sends_wei() {
        let chain = RecordingChain::default();
        let hash = add_balance_eth(&chain, &eth_transfer("0.5")).await.unwrap();
        assert_eq!(hash, TxHash::repeat_byte(0xee));
        assert_eq!(
            chain.calls(),
            vec![
                Call::Impersonate(HOLDER),
                Call::SendEth(HOLDER, RECIPIENT, U256::from(500_000_000_000_000_000u64)),
                Call::StopImpersonating(HOLDER),
            ]
        );
    }

    #[tokio::test]
    async fn add_balance_eth_rejects_bad_amount_before_any_call() {
        let chain = RecordingChain::default();
        let err = add_balance_eth(&chain, &eth_transfer("-1")).await.unwrap_err();
        assert!(matches!(err, ChainError::InvalidAmount { .. }));
        assert!(chain.calls().is_empty());
    }

    #[tokio::test]
    async fn add_balance_eth_releases_holder_when_send_fails() {
        let chain = RecordingChain::failing(|c| matches!(c, Call::SendEth(..)));
        assert!(add_balance_eth(&chain, &eth_transfer("1")).await.is_err());
        assert_eq!(chain.calls().last(), Some(&Call::StopImpersonating(HOLDER)));
    }

    #[rstest]
    #[case("1000", 6, U256::from(1_000_000_000u64))]
    #[case("1.5", 18, U256::from(1_500_000_000_000_000_000u64))]
    #[case(" 2 ", 0, U256::from(2u64))]
    fn token_amounts(#[case] amount: &str, #[case] decimals: u8, #[case] expected: U256) {
        assert_eq!(token_amount(amount, decimals).unwrap(), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("-5")]
    #[case("1,000")]
    fn invalid_token_amounts(#[case] amount: &str) {
        assert!(matches!(token_amount(amount, 6), Err(ChainError::InvalidAmount { .. })));
    }

    #[test]
    fn ether_amounts() {
        assert_eq!(ether_amount("1").unwrap(), U256::from(1_000_000_000_000_000_000u64));
        assert!(ether_amount("one").is_err());
    }
}
