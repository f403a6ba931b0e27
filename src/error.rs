use alloy::primitives::Address;
use thiserror::Error;

use crate::config::ConfigError;

/// Failure categories surfaced by the CLI. Every variant aborts the
/// operation it occurred in; nothing is retried implicitly.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed user input, rejected before any network traffic.
    #[error("invalid input: {0}")]
    Validation(String),

    /// No signing credential could be obtained, either directly or
    /// through an interactive prompt.
    #[error("missing signing credential: {0}")]
    CredentialMissing(String),

    /// Hardware wallet enumeration found no connected device.
    #[error("could not detect a Ledger device")]
    DeviceNotFound,

    /// The network refused to estimate gas for the assembled call.
    #[error("gas estimation failed: {0}")]
    EstimationFailed(String),

    /// The signing device or key declined to produce a signature.
    #[error("signing failed: {0}")]
    SigningRejected(String),

    /// The recovered signer does not match the address the call was
    /// assembled for. The signed bytes are discarded.
    #[error("signer address {intended} does not match the calculated signature address {recovered}")]
    VerificationMismatch { intended: Address, recovered: Address },

    /// The network rejected the signed transaction at submission.
    #[error("broadcast failed: {0}")]
    BroadcastFailure(String),

    /// State derived from event logs disagrees with an authoritative
    /// on-chain counter.
    #[error("reconciliation failed: {0}")]
    ReconciliationMismatch(String),

    /// An interactive prompt could not be serviced.
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Transport or query failure outside the categories above.
    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, CliError>;
