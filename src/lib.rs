//! Resume screener library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;
pub mod server;

pub use error::{ExtractionError, Result, ScreenerError};
pub use config::Config;
