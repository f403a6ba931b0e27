//! Hardware-wallet signing over an exclusive device session.
//!
//! The device is addressed through [`DeviceTransport`] so the probing
//! and confirmation flow can run against a scripted device in tests.

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Signature, U256};
use async_trait::async_trait;

use crate::error::{CliError, Result};
use crate::prompt::Prompt;

// Popular derivation paths for hierarchical deterministic wallet generation
// m / purpose' / coin_type' / account' / change / address_index
// https://github.com/bitcoin/bips/blob/master/bip-0044.mediawiki
pub const HD_WALLET_DERIVATION_PATHS: [&str; 4] = [
    "m/44'/60'/0'/0/0", // Official Ethereum BIP 44 format
    "m/44'/60'/0'/0",   // MEW Ethereum
    "m/44'/60'/0'",     // Ledger Ethereum
    "m/44'/60'",        // Some legacy format Ethereum
];

/// Raw signature components as reported by a device. `v` may follow
/// any of the common conventions; see [`signature_from_parts`].
#[derive(Debug, Clone, Copy)]
pub struct DeviceSignature {
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

/// A connected signing device. One session, one request at a time.
#[async_trait]
pub trait DeviceTransport: Send {
    /// Identifiers of every connected device.
    async fn list_devices(&mut self) -> Result<Vec<String>>;

    /// The address derived at `path` on the device.
    async fn get_address(&mut self, path: &str) -> Result<Address>;

    /// Ask the device to sign the transaction derived at `path`. The
    /// device shows the call to its holder before signing.
    async fn sign_transaction(&mut self, path: &str, tx: &TxLegacy) -> Result<DeviceSignature>;
}

/// Signer bound to one derivation path on one device. The path and
/// address are resolved once, when the session opens.
pub struct HardwareSigner {
    transport: Box<dyn DeviceTransport>,
    path: String,
    address: Address,
}

impl std::fmt::Debug for HardwareSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HardwareSigner")
            .field("path", &self.path)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl HardwareSigner {
    /// Open a session. With an explicit derivation path the device is
    /// queried once for its address; otherwise each well-known path is
    /// probed and the user picks an address from the results.
    pub async fn connect(
        mut transport: Box<dyn DeviceTransport>,
        explicit_path: Option<&str>,
        prompt: &dyn Prompt,
    ) -> Result<Self> {
        let devices = transport.list_devices().await?;
        if devices.is_empty() {
            return Err(CliError::DeviceNotFound);
        }

        let (path, address) = match explicit_path {
            Some(path) => {
                let address = transport.get_address(path).await?;
                println!(
                    "Using HD wallet derivation path {} with address {}",
                    path, address
                );
                (path.to_string(), address)
            }
            None => {
                // The session is exclusive, so candidates are probed
                // one request at a time.
                let mut candidates = Vec::with_capacity(HD_WALLET_DERIVATION_PATHS.len());
                for path in HD_WALLET_DERIVATION_PATHS {
                    let address = transport.get_address(path).await?;
                    candidates.push((path.to_string(), address));
                }
                let choices: Vec<String> =
                    candidates.iter().map(|(_, addr)| addr.to_string()).collect();
                let picked = prompt.select("Select an address to use", &choices)?;
                match candidates.into_iter().nth(picked) {
                    Some(chosen) => chosen,
                    None => {
                        return Err(CliError::Prompt(format!(
                            "selection index {} out of range",
                            picked
                        )))
                    }
                }
            }
        };

        tracing::debug!(path = %path, address = %address, "hardware wallet session open");

        Ok(Self {
            transport,
            path,
            address,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Have the device sign an assembled transaction with the session's
    /// derivation path.
    pub async fn sign(&mut self, tx: &TxLegacy) -> Result<Signature> {
        debug_assert!(tx.chain_id.is_some());
        println!("Confirm and sign the transaction on your Ledger device");
        let parts = self.transport.sign_transaction(&self.path, tx).await?;
        Ok(signature_from_parts(parts))
    }
}

/// Normalize a device signature's `v` into a parity bit.
///
/// Devices report `v` as 0/1, as 27/28, or as the full EIP-155 value
/// `chain_id * 2 + 35 + parity`, sometimes truncated to a single byte.
/// In the 27/28 and EIP-155 forms odd parity lands on an even `v`.
pub fn signature_from_parts(parts: DeviceSignature) -> Signature {
    let y_parity = match parts.v {
        0 | 1 => parts.v == 1,
        v => v % 2 == 0,
    };
    Signature::new(parts.r, parts.s, y_parity)
}
