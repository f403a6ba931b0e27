//! Time-locked mint proposal commands.
//!
//! `reject` and `send` are member-gated on the contract; `propose` has
//! no pre-flight check. `list` rebuilds the pending ledger from logs
//! and fetches each surviving record from the chain.

use alloy::primitives::U256;
use alloy::sol_types::SolCall;
use console::style;

use crate::chain::contracts::{self, proposeMintCall, rejectMintCall, sendMintCall};
use crate::commands::{resolve_signer, Context, MintProposeArgs, MintRejectArgs, MintSendArgs};
use crate::error::Result;
use crate::prompt::Prompt;
use crate::scan::{details, pending_mints, PendingMintRow};
use crate::tx::{authorize, deliver, CallSummary, Delivery};
use crate::units::{from_base_units, to_base_units};

pub async fn propose(ctx: &Context, args: &MintProposeArgs, prompt: &dyn Prompt) -> Result<()> {
    let value = to_base_units(&args.amount, ctx.decimals)?;
    let overrides = args.signing.overrides()?;
    let mut signer = resolve_signer(&args.signing, ctx.network.chain_id, prompt).await?;

    let recipient = args.to.unwrap_or_else(|| signer.address());

    let data = proposeMintCall { recipient, value }.abi_encode();
    let authorized = authorize(
        ctx.rpc(),
        &mut signer,
        ctx.network.issuer_address,
        data.into(),
        &overrides,
    )
    .await?;

    let summary = CallSummary {
        method: "proposeMint",
        args: format!("{},{}", recipient, value),
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
        println!("Proposed mint to {} for {}", recipient, args.amount);
    }
    Ok(())
}

pub async fn reject(ctx: &Context, args: &MintRejectArgs, prompt: &dyn Prompt) -> Result<()> {
    let overrides = args.signing.overrides()?;
    let mut signer = resolve_signer(&args.signing, ctx.network.chain_id, prompt).await?;

    if !contracts::is_member(ctx.rpc(), ctx.network.issuer_address, signer.address()).await? {
        println!(
            "Only issuer members can call this method, {} is not a member",
            signer.address()
        );
        return Ok(());
    }

    let data = rejectMintCall {
        pendingMintIndex: args.index,
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
        method: "rejectMint",
        args: args.index.to_string(),
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
        println!("Rejected mint proposal {}", args.index);
    }
    Ok(())
}

pub async fn send(ctx: &Context, args: &MintSendArgs, prompt: &dyn Prompt) -> Result<()> {
    let overrides = args.signing.overrides()?;
    let mut signer = resolve_signer(&args.signing, ctx.network.chain_id, prompt).await?;

    if !contracts::is_member(ctx.rpc(), ctx.network.issuer_address, signer.address()).await? {
        println!(
            "Only issuer members can call this method, {} is not a member",
            signer.address()
        );
        return Ok(());
    }

    let info = contracts::pending_mint(ctx.rpc(), ctx.network.issuer_address, args.index).await?;
    println!(
        "You are about to mint to {} a total of {} tokens",
        info.recipient,
        from_base_units(info.value, ctx.decimals)
    );

    let data = sendMintCall {
        pendingMintIndex: args.index,
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
        method: "sendMint",
        args: args.index.to_string(),
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
        println!(
            "Accepted mint proposal {} and sent mint transaction",
            args.index
        );
    }
    Ok(())
}

/// List pending proposals. Rows whose time lock has not elapsed yet
/// are highlighted.
pub async fn list(ctx: &Context) -> Result<()> {
    let scan = pending_mints(ctx.rpc(), ctx.network.issuer_address).await?;
    let rows = details(ctx.rpc(), ctx.network.issuer_address, &scan).await?;
    let current_block = ctx.rpc().block_number().await?;

    println!("Total of {} pending mints", rows.len());
    println!("The current block number is {}", current_block);

    for row in &rows {
        let line = format_row(row, ctx.decimals);
        if is_time_locked(row.info.can_mint_at_block, current_block) {
            println!("{}", style(line).yellow());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

fn format_row(row: &PendingMintRow, decimals: u8) -> String {
    format!(
        "Index: {}\tProposed by: {}\tRecipient: {}\tAmount: {}\tMintable after block: {}",
        row.index,
        row.proposer,
        row.info.recipient,
        from_base_units(row.info.value, decimals),
        row.info.can_mint_at_block
    )
}

fn is_time_locked(can_mint_at_block: U256, current_block: u64) -> bool {
    can_mint_at_block > U256::from(current_block)
}
