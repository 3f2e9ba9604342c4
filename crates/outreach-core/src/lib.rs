pub mod config;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod io;
pub mod ledger;
pub mod pacing;
pub mod paths;
pub mod platform;
pub mod retry;
pub mod simulated;
pub mod sleep;
pub mod types;

pub use error::{OutreachError, Result, RetryError};
