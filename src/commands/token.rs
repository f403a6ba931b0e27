//! Token commands: supply, transfer, burn, mint.

use alloy::sol_types::SolCall;

use crate::chain::contracts::{self, burnCall, mintToCall, transferCall};
use crate::commands::{resolve_signer, BurnArgs, Context, MintArgs, TransferArgs};
use crate::error::Result;
use crate::prompt::Prompt;
use crate::tx::{authorize, deliver, CallSummary, Delivery};
use crate::units::{from_base_units, to_base_units};

/// Print the token's total supply in decimal units.
pub async fn supply(ctx: &Context) -> Result<()> {
    let supply = contracts::total_supply(ctx.rpc(), ctx.network.token_address).await?;
    println!("Total supply {}", from_base_units(supply, ctx.decimals));
    Ok(())
}

pub async fn transfer(ctx: &Context, args: &TransferArgs, prompt: &dyn Prompt) -> Result<()> {
    let value = to_base_units(&args.amount, ctx.decimals)?;
    let overrides = args.signing.overrides()?;
    let mut signer = resolve_signer(&args.signing, ctx.network.chain_id, prompt).await?;

    let data = transferCall { to: args.to, value }.abi_encode();
    let authorized = authorize(
        ctx.rpc(),
        &mut signer,
        ctx.network.token_address,
        data.into(),
        &overrides,
    )
    .await?;

    let summary = CallSummary {
        method: "transfer",
        args: format!("{},{}", args.to, value),
        contract: ctx.network.token_address,
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
            "Transferred {} from {} to {}",
            args.amount, authorized.signer, args.to
        );
    }
    Ok(())
}

pub async fn burn(ctx: &Context, args: &BurnArgs, prompt: &dyn Prompt) -> Result<()> {
    let value = to_base_units(&args.amount, ctx.decimals)?;
    let overrides = args.signing.overrides()?;
    let mut signer = resolve_signer(&args.signing, ctx.network.chain_id, prompt).await?;

    let data = burnCall { value }.abi_encode();
    let authorized = authorize(
        ctx.rpc(),
        &mut signer,
        ctx.network.token_address,
        data.into(),
        &overrides,
    )
    .await?;

    let summary = CallSummary {
        method: "burn",
        args: value.to_string(),
        contract: ctx.network.token_address,
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
        println!("Burned {} from {}", args.amount, authorized.signer);
    }
    Ok(())
}

pub async fn mint(ctx: &Context, args: &MintArgs, prompt: &dyn Prompt) -> Result<()> {
    let value = to_base_units(&args.amount, ctx.decimals)?;
    let overrides = args.signing.overrides()?;
    let mut signer = resolve_signer(&args.signing, ctx.network.chain_id, prompt).await?;

    let data = mintToCall { to: args.to, value }.abi_encode();
    let authorized = authorize(
        ctx.rpc(),
        &mut signer,
        ctx.network.token_address,
        data.into(),
        &overrides,
    )
    .await?;

    let summary = CallSummary {
        method: "mintTo",
        args: format!("{},{}", args.to, value),
        contract: ctx.network.token_address,
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
        println!("Minted {} to {}", args.amount, args.to);
    }
    Ok(())
}
