#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::NetworkError;

mod network;
pub use network::Network;

mod env;
pub use env::Environment;

mod config;
pub use config::{GWEI, GasPrice, NetworkConfig};

mod fork;
pub use fork::{ForkConfig, MiningConfig, TEST_MNEMONIC};
