#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// CLI argument parsing.
///
/// The [`Cli`] struct holds the global options (network, RPC override,
/// verbosity and environment settings) and one [`Command`] per task.
mod cli;
pub use cli::{Cli, Command, EnvArgs};

mod profile;
pub use profile::NodeProfile;

/// Tracing initialization utilities.
///
/// The [`init_tracing`] function configures the tracing subscriber with a
/// verbosity-based log level and respects the `RUST_LOG` environment variable.
mod tracing_init;
pub use crate::tracing_init::{init_tracing, verbosity_level};

/// Ctrl+C signal handler utilities.
mod ctrlc;
pub use crate::ctrlc::wait_for_ctrlc;
