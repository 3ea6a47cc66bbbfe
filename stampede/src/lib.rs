#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod aggregator;
mod error;
pub mod executor;
pub mod runner;

pub use error::Error;
pub use executor::HttpExecutor;
pub use runner::{run_http, AbortHandle, RunState, Runner};

pub use stampede_core as core;
pub use stampede_core::{RequestOutcome, RunConfig, RunSummary, StatusBucket};

pub mod prelude {
    pub use crate::executor::HttpExecutor;
    pub use crate::runner::{run_http, AbortHandle, Runner};
    pub use stampede_core::{RequestOutcome, RunConfig, RunSummary, StatusBucket};
}
