//! Operations CLI for a stablecoin token and its issuance governor.
//!
//! State-changing commands assemble a legacy transaction, sign it with
//! a local key or a Ledger device, verify the signature by recovering
//! the signer locally, then gate on dry-run and confirmation before a
//! single broadcast attempt. Read commands rebuild governance state
//! (issuer membership, pending time-locked mints) from the contract's
//! event logs and reconcile it against on-chain counters before
//! showing anything.

// Chain access and contract surface
pub mod chain;
pub mod config;

// Signing and the transaction pipeline
pub mod signing;
pub mod tx;

// Log replay for governance state
pub mod scan;

// Command surface
pub mod commands;
pub mod prompt;
pub mod units;

pub mod error;

pub use commands::{execute, Cli};
pub use config::AppConfig;
pub use error::{CliError, Result};
