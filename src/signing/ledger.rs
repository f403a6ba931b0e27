//! Ledger device transport.
//!
//! Sessions open lazily and are rebuilt when a different derivation
//! path is requested for signing, since a session signs with the path
//! it was opened on.

use alloy::consensus::TxLegacy;
use alloy::network::TxSigner;
use alloy::primitives::Address;
use alloy_signer_ledger::{HDPath, LedgerSigner};
use async_trait::async_trait;

use crate::error::{CliError, Result};
use crate::signing::hardware::{DeviceSignature, DeviceTransport};

pub struct LedgerTransport {
    chain_id: u64,
    session: Option<(String, LedgerSigner)>,
}

impl LedgerTransport {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            session: None,
        }
    }

    async fn ensure_session(&mut self, path: &str) -> Result<()> {
        if let Some((open_path, _)) = &self.session {
            if open_path == path {
                return Ok(());
            }
        }
        let signer = LedgerSigner::new(HDPath::Other(path.to_string()), Some(self.chain_id))
            .await
            .map_err(|e| {
                CliError::CredentialMissing(format!("cannot open Ledger session: {}", e))
            })?;
        self.session = Some((path.to_string(), signer));
        Ok(())
    }

    /// Address lookups work from any open session.
    async fn ensure_any_session(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }
        self.ensure_session(crate::signing::HD_WALLET_DERIVATION_PATHS[0]).await
    }
}

#[async_trait]
impl DeviceTransport for LedgerTransport {
    async fn list_devices(&mut self) -> Result<Vec<String>> {
        // Enumeration doubles as the connectivity probe: if no session
        // can be opened, no device is usable.
        match self.ensure_any_session().await {
            Ok(()) => Ok(vec!["ledger".to_string()]),
            Err(e) => {
                tracing::debug!(error = %e, "no usable Ledger device");
                Ok(Vec::new())
            }
        }
    }

    async fn get_address(&mut self, path: &str) -> Result<Address> {
        self.ensure_any_session().await?;
        let Some((_, session)) = &self.session else {
            return Err(CliError::DeviceNotFound);
        };
        session
            .get_address_with_path(&HDPath::Other(path.to_string()))
            .await
            .map_err(|e| CliError::CredentialMissing(format!("Cannot fetch ledger address: {}", e)))
    }

    async fn sign_transaction(&mut self, path: &str, tx: &TxLegacy) -> Result<DeviceSignature> {
        self.ensure_session(path).await?;
        let Some((_, session)) = &self.session else {
            return Err(CliError::DeviceNotFound);
        };
        let mut unsigned = tx.clone();
        let signature = TxSigner::sign_transaction(session, &mut unsigned)
            .await
            .map_err(|e| {
                CliError::SigningRejected(format!("Could not sign transaction on Ledger: {}", e))
            })?;
        Ok(DeviceSignature {
            v: u64::from(signature.v()),
            r: signature.r(),
            s: signature.s(),
        })
    }
}
