//! Transaction signing.
//!
//! Two interchangeable methods: an in-process private key and a
//! hardware wallet. Both are resolved to a [`Signer`] once per
//! invocation; the signer's identity never changes afterwards.

pub mod hardware;
pub mod local;

#[cfg(feature = "ledger")]
pub mod ledger;

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Signature};
use clap::ValueEnum;

use crate::error::Result;

pub use hardware::{DeviceSignature, DeviceTransport, HardwareSigner, HD_WALLET_DERIVATION_PATHS};
pub use local::LocalSigner;

/// Signature method selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SigMethod {
    /// Sign in-process with a private key.
    Privkey,
    /// Sign on a connected Ledger device.
    Ledger,
}

/// A resolved signer. Identity and signing go through the same handle
/// so the address shown to the user is the address that signs.
pub enum Signer {
    Local(LocalSigner),
    Hardware(HardwareSigner),
}

impl Signer {
    /// The address every transaction in this invocation is built for.
    pub fn address(&self) -> Address {
        match self {
            Signer::Local(signer) => signer.address(),
            Signer::Hardware(signer) => signer.address(),
        }
    }

    /// Sign an assembled transaction.
    pub async fn sign(&mut self, tx: &TxLegacy) -> Result<Signature> {
        match self {
            Signer::Local(signer) => signer.sign(tx),
            Signer::Hardware(signer) => signer.sign(tx).await,
        }
    }
}

/// Open the platform device transport for hardware signing.
#[cfg(feature = "ledger")]
pub fn open_device_transport(chain_id: u64) -> Result<Box<dyn DeviceTransport>> {
    Ok(Box::new(ledger::LedgerTransport::new(chain_id)))
}

/// Without the `ledger` feature there is no device transport to open.
#[cfg(not(feature = "ledger"))]
pub fn open_device_transport(_chain_id: u64) -> Result<Box<dyn DeviceTransport>> {
    Err(crate::error::CliError::CredentialMissing(
        "this build has no Ledger support; rebuild with `--features ledger`".to_string(),
    ))
}
