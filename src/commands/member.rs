//! Issuer membership commands.
//!
//! `add` and `remove` are owner-gated on the contract; the pre-flight
//! check here only spares the user a reverting transaction, the
//! contract stays the authority.

use std::collections::BTreeSet;

use alloy::primitives::Address;
use alloy::sol_types::SolCall;

use crate::chain::contracts::{self, addMemberCall, removeMemberCall};
use crate::commands::{resolve_signer, Context, MemberAddArgs, MemberRemoveArgs};
use crate::error::Result;
use crate::prompt::Prompt;
use crate::scan::membership;
use crate::tx::{authorize, deliver, CallSummary, Delivery};

pub async fn add(ctx: &Context, args: &MemberAddArgs, prompt: &dyn Prompt) -> Result<()> {
    let overrides = args.signing.overrides()?;
    let mut signer = resolve_signer(&args.signing, ctx.network.chain_id, prompt).await?;

    let owner = contracts::owner(ctx.rpc(), ctx.network.issuer_address).await?;
    if owner != signer.address() {
        println!(
            "Only owner can call this method, {} is not the owner",
            signer.address()
        );
        return Ok(());
    }

    let data = addMemberCall {
        account: args.address,
    }
    .abi_encode();
    let authorized = authorize(
        ctx.rpc(),
        &mut signer,
        ctx.network.issuer_address,
        data.into(),
        &overrides,
    )
    .await?;

    let summary = CallSummary {
        method: "addMember",
        args: args.address.to_string(),
        contract: ctx.network.issuer_address,
    };
    let delivery = deliver(
        ctx.rpc(),
        prompt,
        &authorized,
        &summary,
        args.signing.broadcast_options(),
    )
    .await?;

    if let Delivery::Sent { .. } = delivery {
        println!("Added {} as a member of issuer", args.address);
    }
    Ok(())
}

pub async fn remove(ctx: &Context, args: &MemberRemoveArgs, prompt: &dyn Prompt) -> Result<()> {
    let overrides = args.signing.overrides()?;
    let mut signer = resolve_signer(&args.signing, ctx.network.chain_id, prompt).await?;

    let owner = contracts::owner(ctx.rpc(), ctx.network.issuer_address).await?;
    if owner != signer.address() {
        println!(
            "Only owner can call this method, {} is not the owner",
            signer.address()
        );
        return Ok(());
    }

    let data = removeMemberCall {
        account: args.address,
    }
    .abi_encode();
    let authorized = authorize(
        ctx.rpc(),
        &mut signer,
        ctx.network.issuer_address,
        data.into(),
        &overrides,
    )
    .await?;

    let summary = CallSummary {
        method: "removeMember",
        args: args.address.to_string(),
        contract: ctx.network.issuer_address,
    };
    let delivery = deliver(
        ctx.rpc(),
        prompt,
        &authorized,
        &summary,
        args.signing.broadcast_options(),
    )
    .await?;

    if let Delivery::Sent { .. } = delivery {
        println!("Removed {} as a member of issuer", args.address);
    }
    Ok(())
}

/// List the membership set rebuilt from the event logs.
pub async fn list(ctx: &Context) -> Result<()> {
    let members = membership(ctx.rpc(), ctx.network.issuer_address).await?;
    println!("Total of {} issuer members", members.len());
    println!("{}", format_members(&members));
    Ok(())
}

fn format_members(members: &BTreeSet<Address>) -> String {
    members
        .iter()
        .map(|member| member.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_format_members_joins_without_spaces() {
        let mut members = BTreeSet::new();
        members.insert(address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        members.insert(address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8"));

        let rendered = format_members(&members);
        assert_eq!(
            rendered,
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8,0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_format_members_empty_set() {
        assert_eq!(format_members(&BTreeSet::new()), "");
    }
}
