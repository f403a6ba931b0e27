//! Issuer membership reconstructed from AddMember/RemoveMember logs.

use std::collections::BTreeSet;

use alloy::primitives::Address;
use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;

use crate::chain::contracts::{num_members, AddMember, RemoveMember};
use crate::chain::ChainRpc;
use crate::error::Result;
use crate::scan::{fetch_ordered, reconcile};

/// Replay one membership log into the set.
fn apply(members: &mut BTreeSet<Address>, log: &Log) {
    let Some(topic0) = log.topics().first() else {
        return;
    };
    if *topic0 == AddMember::SIGNATURE_HASH {
        if let Ok(decoded) = log.log_decode::<AddMember>() {
            members.insert(decoded.inner.account);
        } else {
            tracing::warn!(block = ?log.block_number, "undecodable AddMember log skipped");
        }
    } else if *topic0 == RemoveMember::SIGNATURE_HASH {
        if let Ok(decoded) = log.log_decode::<RemoveMember>() {
            members.remove(&decoded.inner.account);
        } else {
            tracing::warn!(block = ?log.block_number, "undecodable RemoveMember log skipped");
        }
    }
}

/// The current membership set, replayed from genesis and reconciled
/// against the contract's `numMembers` counter.
pub async fn membership(rpc: &dyn ChainRpc, issuer: Address) -> Result<BTreeSet<Address>> {
    let logs = fetch_ordered(
        rpc,
        issuer,
        &[AddMember::SIGNATURE_HASH, RemoveMember::SIGNATURE_HASH],
    )
    .await?;

    let mut members = BTreeSet::new();
    for log in &logs {
        apply(&mut members, log);
    }

    let expected = num_members(rpc, issuer).await?;
    reconcile("membership size", members.len() as u64, expected)?;

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::testutil::log_at;
    use alloy::primitives::{Bytes, B256};

    fn issuer() -> Address {
        Address::repeat_byte(0x15)
    }

    fn add(block: u64, member: Address) -> Log {
        log_at(
            block,
            issuer(),
            vec![AddMember::SIGNATURE_HASH, member.into_word()],
            Bytes::new(),
        )
    }

    fn remove(block: u64, member: Address) -> Log {
        log_at(
            block,
            issuer(),
            vec![RemoveMember::SIGNATURE_HASH, member.into_word()],
            Bytes::new(),
        )
    }

    #[test]
    fn test_add_then_remove_leaves_no_member() {
        let alice = Address::repeat_byte(0xaa);
        let mut members = BTreeSet::new();
        apply(&mut members, &add(1, alice));
        assert_eq!(members.len(), 1);
        apply(&mut members, &remove(5, alice));
        assert!(members.is_empty());
    }

    #[test]
    fn test_readding_a_removed_member() {
        let bob = Address::repeat_byte(0xbb);
        let mut members = BTreeSet::new();
        for log in [add(1, bob), remove(2, bob), add(9, bob)] {
            apply(&mut members, &log);
        }
        assert_eq!(members.iter().collect::<Vec<_>>(), vec![&bob]);
    }

    #[test]
    fn test_duplicate_adds_count_once() {
        let carol = Address::repeat_byte(0xcc);
        let mut members = BTreeSet::new();
        apply(&mut members, &add(1, carol));
        apply(&mut members, &add(2, carol));
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn test_unrelated_topic_ignored() {
        let mut members = BTreeSet::new();
        let noise = log_at(
            3,
            issuer(),
            vec![B256::repeat_byte(0x77), Address::repeat_byte(0xdd).into_word()],
            Bytes::new(),
        );
        apply(&mut members, &noise);
        assert!(members.is_empty());
    }
}
