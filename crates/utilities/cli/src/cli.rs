use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};
use forkctl_networks::{Environment, Network, NetworkConfig};

use crate::NodeProfile;

/// forkctl CLI arguments.
///
/// Tasks run against the chain selected by `--network`. Use `--rpc-url` to
/// point at a node other than the network's default endpoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "forkctl", version, about = "Maintenance tasks for forked development chains")]
pub struct Cli {
    /// Verbosity level (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Target network (mainnet, base, hardhat, localhost)
    #[arg(short, long, env = "FORKCTL_NETWORK", default_value = "localhost", global = true)]
    pub network: Network,

    /// RPC URL overriding the network's default endpoint
    #[arg(short, long, env = "FORKCTL_RPC_URL", global = true)]
    pub rpc_url: Option<String>,

    /// API keys and fork settings
    #[command(flatten)]
    pub env: EnvArgs,

    /// Task to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Resolved settings for the selected network.
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig::resolve(self.network, &self.env.environment())
    }

    /// Endpoint to connect to: `--rpc-url` if given, otherwise the network's.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.rpc_url.clone().unwrap_or_else(|| self.network_config().url)
    }
}

/// Settings normally provided through the environment or a `.env` file.
#[derive(Args, Debug, Clone, Default)]
pub struct EnvArgs {
    /// Alchemy API key
    #[arg(long, env = "ALCHEMY_KEY", hide_env_values = true, global = true)]
    pub alchemy_key: Option<String>,

    /// Infura project key
    #[arg(long, env = "INFURA_KEY", hide_env_values = true, global = true)]
    pub infura_key: Option<String>,

    /// Network that local nodes fork
    #[arg(long, env = "FORKING_NETWORK", global = true)]
    pub forking_network: Option<Network>,

    /// Block number to fork at
    #[arg(long, env = "FORKING_BLOCK_NUMBER", global = true)]
    pub forking_block_number: Option<u64>,

    /// Chain id of local nodes
    #[arg(long, env = "FORKING_CHAIN_ID", global = true)]
    pub forking_chain_id: Option<u64>,
}

impl EnvArgs {
    /// Converts the parsed arguments into an [`Environment`].
    #[must_use]
    pub fn environment(&self) -> Environment {
        Environment {
            alchemy_key: self.alchemy_key.clone(),
            infura_key: self.infura_key.clone(),
            forking_network: self.forking_network,
            forking_block_number: self.forking_block_number,
            forking_chain_id: self.forking_chain_id,
        }
    }
}

/// Available tasks.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Increase the timestamp of the last block by the time interval.
    AddTime {
        /// You can specify 1y2w3d4h5m6s (e.g. 1h30m)
        #[arg(required = true, num_args = 1.., value_name = "TIME")]
        time: Vec<String>,
    },

    /// Show current time in blockchain
    Now,

    /// Mine a single block
    Mine,

    /// Transfer ERC20 tokens from holder to recipient
    AddBalance {
        /// Token address (0x...)
        #[arg(long)]
        token: Address,
        /// Holder address (0x...)
        #[arg(long)]
        holder: Address,
        /// Recipient address (0x...)
        #[arg(long)]
        recipient: Address,
        /// Human value, e.g. 1000
        #[arg(long)]
        amount: String,
    },

    /// Send ETH from holder to recipient
    AddBalanceEth {
        /// Recipient address (0x...)
        #[arg(long)]
        recipient: Address,
        /// Holder address (0x...)
        #[arg(long)]
        holder: Address,
        /// Ether amount, e.g. 0.5
        #[arg(long)]
        amount: String,
    },

    /// Print the resolved configuration of every network as JSON
    Networks,

    /// Start a local anvil node forking FORKING_NETWORK (mainnet by default)
    Node {
        /// Port to listen on
        #[arg(long, default_value_t = 8545)]
        port: u16,
        /// Settings profile for the node
        #[arg(long, value_enum, default_value_t = NodeProfile::Fork)]
        profile: NodeProfile,
    },
}
