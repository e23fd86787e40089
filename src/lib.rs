//! # scatter
//!
//! Command-line client for concurrent search aggregation.
//!
//! The aggregation core lives in [`scatter_search`]; this crate adds TOML
//! configuration, run-mode dispatch, and report rendering for the
//! `scatter` binary.

pub mod config;
pub mod error;
pub mod report;
pub mod runner;

pub use config::ScatterConfig;
pub use error::{Result, ScatterError};
pub use runner::{run, Mode, Report};
