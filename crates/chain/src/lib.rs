#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::ChainError;

mod block;
pub use block::BlockTime;

mod control;
pub use control::ChainControl;

mod rpc;
pub use rpc::{IERC20, RpcChain, TxOverrides};

mod node;
pub use node::ForkNode;

pub mod tasks;

// Re-export useful types from alloy for convenience
pub use alloy::primitives::{Address, TxHash, U256};
