//! Signing with mandatory self-verification.
//!
//! Every signed transaction is decoded back and its signer recovered
//! locally before it can be broadcast. A transaction whose recovered
//! signer differs from the address it was assembled for never leaves
//! the process.

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{SignableTransaction, TxEnvelope};
use alloy::eips::eip2718::{Decodable2718, Encodable2718};
use alloy::primitives::{Address, Bytes, TxHash};

use crate::chain::ChainRpc;
use crate::error::{CliError, Result};
use crate::signing::Signer;
use crate::tx::assembler::{assemble, Overrides};

/// A signed, serialized, self-verified transaction.
#[derive(Debug)]
pub struct AuthorizedTx {
    /// RLP-encoded signed transaction, ready for submission.
    pub raw: Vec<u8>,
    /// Hash the network will know this transaction by.
    pub tx_hash: TxHash,
    /// The verified signer.
    pub signer: Address,
}

/// Assemble, sign and self-verify a contract call from the signer's
/// address.
pub async fn authorize(
    rpc: &dyn ChainRpc,
    signer: &mut Signer,
    to: Address,
    data: Bytes,
    overrides: &Overrides,
) -> Result<AuthorizedTx> {
    let from = signer.address();
    let tx = assemble(rpc, from, to, data, overrides).await?;

    let signature = signer.sign(&tx).await?;
    let signed = tx.into_signed(signature);
    let tx_hash = *signed.hash();
    let raw = TxEnvelope::Legacy(signed).encoded_2718();

    let recovered = recover_sender(&raw)?;
    if recovered != from {
        return Err(CliError::VerificationMismatch {
            intended: from,
            recovered,
        });
    }

    tracing::debug!(tx_hash = %tx_hash, signer = %from, "transaction authorized");

    Ok(AuthorizedTx {
        raw,
        tx_hash,
        signer: from,
    })
}

/// Recover the signer of a serialized signed transaction. Pure local
/// computation, no network involved.
pub fn recover_sender(raw: &[u8]) -> Result<Address> {
    let envelope = TxEnvelope::decode_2718(&mut &raw[..])
        .map_err(|e| CliError::Rpc(format!("could not decode signed transaction: {}", e)))?;
    envelope
        .recover_signer()
        .map_err(|e| CliError::Rpc(format!("could not recover signer: {}", e)))
}
