#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::{DurationError, FORMAT_HINT};

mod unit;
pub use unit::DurationUnit;

mod parser;
pub use parser::{DurationToken, parse_duration, parse_duration_args, tokens};
