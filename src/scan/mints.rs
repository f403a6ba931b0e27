//! Pending-mint ledger reconstructed from the mint lifecycle logs.

use std::collections::BTreeMap;

use alloy::primitives::{Address, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;
use futures_util::future;

use crate::chain::contracts::{
    pending_mint, pending_mints_index, MintProposed, MintRejected, MintSent, PendingMintInfo,
};
use crate::chain::ChainRpc;
use crate::error::{CliError, Result};
use crate::scan::{fetch_ordered, reconcile};

/// Ledger state derived from the logs.
#[derive(Debug, Default)]
pub struct PendingMintScan {
    /// Proposals still awaiting execution or rejection, by index.
    pub pending: BTreeMap<U256, Address>,
    /// Count of every proposal ever seen, surviving or not.
    pub proposed_total: u64,
}

/// One displayable pending mint: log-derived identity plus the
/// authoritative on-chain record.
#[derive(Debug)]
pub struct PendingMintRow {
    pub index: U256,
    pub proposer: Address,
    pub info: PendingMintInfo,
}

/// Replay one mint lifecycle log into the ledger.
fn apply(scan: &mut PendingMintScan, log: &Log) {
    let Some(topic0) = log.topics().first() else {
        return;
    };
    if *topic0 == MintProposed::SIGNATURE_HASH {
        if let Ok(decoded) = log.log_decode::<MintProposed>() {
            scan.proposed_total += 1;
            scan.pending
                .insert(decoded.inner.pendingMintIndex, decoded.inner.proposer);
        } else {
            tracing::warn!(block = ?log.block_number, "undecodable MintProposed log skipped");
        }
    } else if *topic0 == MintRejected::SIGNATURE_HASH {
        if let Ok(decoded) = log.log_decode::<MintRejected>() {
            scan.pending.remove(&decoded.inner.pendingMintIndex);
        } else {
            tracing::warn!(block = ?log.block_number, "undecodable MintRejected log skipped");
        }
    } else if *topic0 == MintSent::SIGNATURE_HASH {
        if let Ok(decoded) = log.log_decode::<MintSent>() {
            scan.pending.remove(&decoded.inner.pendingMintIndex);
        } else {
            tracing::warn!(block = ?log.block_number, "undecodable MintSent log skipped");
        }
    }
}

/// The pending-mint ledger, replayed from genesis and reconciled
/// against the contract's proposal counter.
pub async fn pending_mints(rpc: &dyn ChainRpc, issuer: Address) -> Result<PendingMintScan> {
    let logs = fetch_ordered(
        rpc,
        issuer,
        &[
            MintProposed::SIGNATURE_HASH,
            MintRejected::SIGNATURE_HASH,
            MintSent::SIGNATURE_HASH,
        ],
    )
    .await?;

    let mut scan = PendingMintScan::default();
    for log in &logs {
        apply(&mut scan, log);
    }

    let expected = pending_mints_index(rpc, issuer).await?;
    reconcile("pending mint proposals", scan.proposed_total, expected)?;

    Ok(scan)
}

/// Fetch the on-chain record for every surviving proposal. The reads
/// are independent and run concurrently.
///
/// A record the contract has already cleared means the logs and the
/// contract disagree about what is still pending.
pub async fn details(
    rpc: &dyn ChainRpc,
    issuer: Address,
    scan: &PendingMintScan,
) -> Result<Vec<PendingMintRow>> {
    let fetches = scan
        .pending
        .keys()
        .map(|index| pending_mint(rpc, issuer, *index));
    let infos = future::try_join_all(fetches).await?;

    scan.pending
        .iter()
        .zip(infos)
        .map(|((index, proposer), info)| {
            if info.recipient == Address::ZERO
                && info.value.is_zero()
                && info.can_mint_at_block.is_zero()
            {
                return Err(CliError::ReconciliationMismatch(format!(
                    "pending mint {} is present in logs but cleared on chain",
                    index
                )));
            }
            Ok(PendingMintRow {
                index: *index,
                proposer: *proposer,
                info,
            })
        })
        .collect()
}
