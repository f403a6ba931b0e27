//! Private-key signing.
//!
//! # Security
//! - Keys arrive via a hidden flag or a masked prompt, never config
//! - Key material lives in zeroized buffers and is never logged

use alloy::consensus::{SignableTransaction, TxLegacy};
use alloy::primitives::{Address, Signature};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use zeroize::Zeroizing;

use crate::error::{CliError, Result};
use crate::prompt::Prompt;

/// In-process signer backed by a secp256k1 private key.
#[derive(Debug)]
pub struct LocalSigner {
    signer: PrivateKeySigner,
}

impl LocalSigner {
    /// Obtain a key from the flag value if given, otherwise from a
    /// masked prompt.
    pub fn acquire(direct: Option<&str>, prompt: &dyn Prompt) -> Result<Self> {
        let key = match direct {
            Some(k) => Zeroizing::new(k.to_string()),
            None => prompt
                .secret("Private key to sign with")
                .map_err(|e| CliError::CredentialMissing(e.to_string()))?,
        };
        Self::from_hex(&key)
    }

    /// Parse a hex-encoded private key (with or without 0x prefix).
    pub fn from_hex(private_key_hex: &str) -> Result<Self> {
        let trimmed = private_key_hex.trim();
        let key_hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| CliError::Validation(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(address = %signer.address(), "local signer ready");

        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign the EIP-155 hash of an assembled transaction.
    pub fn sign(&self, tx: &TxLegacy) -> Result<Signature> {
        self.signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| CliError::SigningRejected(e.to_string()))
    }
}
