#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use clap::Parser;
use eyre::Result;
use forkctl_chain::{
    ChainControl, ChainError, ForkNode, RpcChain,
    tasks::{self, EthTransfer, TokenTransfer},
};
use forkctl_cli::{Cli, Command, init_tracing, wait_for_ctrlc};
use forkctl_networks::NetworkConfig;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; values may come from flags or the shell.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::AddTime { time } => {
            let block = tasks::add_time_with(time, || connect(&cli)).await?;
            println!("{block}");
        }
        Command::Now => {
            let chain = connect(&cli).await?;
            println!("{}", tasks::now(&chain).await?);
        }
        Command::Mine => {
            let chain = connect(&cli).await?;
            tasks::mine(&chain).await?;
        }
        Command::AddBalance { token, holder, recipient, amount } => {
            let chain = connect(&cli).await?;
            let transfer = TokenTransfer {
                token: *token,
                holder: *holder,
                recipient: *recipient,
                amount: amount.clone(),
            };
            let hash = tasks::add_balance(&chain, &transfer).await?;
            println!("Transaction: {hash}");
        }
        Command::AddBalanceEth { recipient, holder, amount } => {
            let chain = connect(&cli).await?;
            let transfer =
                EthTransfer { holder: *holder, recipient: *recipient, amount: amount.clone() };
            let hash = tasks::add_balance_eth(&chain, &transfer).await?;
            println!("Transaction: {hash}");
        }
        Command::Networks => {
            let configs = NetworkConfig::all(&cli.env.environment());
            println!("{}", serde_json::to_string_pretty(&configs)?);
        }
        Command::Node { port, profile } => {
            let fork = profile.fork_config(&cli.env.environment())?;
            let node = ForkNode::spawn(&fork, *port)?;
            println!("Fork node ({profile} profile) at {}", node.endpoint());
            for (i, account) in node.accounts().iter().enumerate() {
                println!("Account #{i}: {account}");
            }
            wait_for_ctrlc().await?;
        }
    }
    Ok(())
}

/// Connects to the selected endpoint with the network's gas and timeout
/// settings, and warns when the chain id is not the one configured for it.
async fn connect(cli: &Cli) -> Result<impl ChainControl, ChainError> {
    let config = cli.network_config();
    let endpoint = cli.endpoint();
    let chain = RpcChain::connect(&endpoint, &config).await?;

    let chain_id = chain.chain_id().await?;
    if chain_id != config.chain_id {
        warn!(
            network = %cli.network,
            expected = config.chain_id,
            actual = chain_id,
            "Connected chain id does not match network"
        );
    }
    info!(network = %cli.network, chain_id, "Connected");
    Ok(chain)
}
