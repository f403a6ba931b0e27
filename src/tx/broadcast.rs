//! Confirmation gating and submission.

use alloy::hex;
use alloy::primitives::{Address, TxHash};

use crate::chain::ChainRpc;
use crate::error::Result;
use crate::prompt::Prompt;
use crate::tx::authorize::AuthorizedTx;

const YES_VALUES: [&str; 2] = ["Y", "YES"];

/// Human-readable description of the call being submitted.
pub struct CallSummary {
    pub method: &'static str,
    pub args: String,
    pub contract: Address,
}

/// Broadcast behavior flags taken from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct BroadcastOptions {
    /// Skip the confirmation prompt.
    pub skip_confirm: bool,
    /// Print the signed transaction instead of submitting it.
    pub no_broadcast: bool,
}

/// What happened to an authorized transaction.
#[derive(Debug)]
pub enum Delivery {
    /// Printed, never submitted.
    DryRun { raw_hex: String },
    /// Declined at the confirmation gate.
    Aborted,
    /// Accepted by the network.
    Sent { tx_hash: TxHash },
}

/// Only an explicit yes broadcasts; anything else aborts.
pub fn is_affirmative(answer: &str) -> bool {
    YES_VALUES.contains(&answer.trim().to_uppercase().as_str())
}

/// Walk an authorized transaction through the dry-run gate, the
/// confirmation gate and a single submission attempt, in that order.
pub async fn deliver(
    rpc: &dyn ChainRpc,
    prompt: &dyn Prompt,
    authorized: &AuthorizedTx,
    summary: &CallSummary,
    options: BroadcastOptions,
) -> Result<Delivery> {
    if options.no_broadcast {
        let raw_hex = format!("0x{}", hex::encode(&authorized.raw));
        println!(
            "Not broadcasting the transaction because --no-broadcast was given. \
             This transaction will not be added to the blockchain unless you broadcast it."
        );
        println!("Signed transaction:\n{}", raw_hex);
        return Ok(Delivery::DryRun { raw_hex });
    }

    if !options.skip_confirm {
        println!(
            "You are about to call {}({}) on {}",
            summary.method, summary.args, summary.contract
        );
        let answer = prompt.read_line("Confirm (Y/N)")?;
        if !is_affirmative(&answer) {
            println!("Aborting operation");
            return Ok(Delivery::Aborted);
        }
    }

    tracing::info!(
        contract = %summary.contract,
        method = summary.method,
        "Broadcasting transaction"
    );
    let tx_hash = rpc.send_raw(&authorized.raw).await?;
    println!("Transaction hash: {}", tx_hash);

    Ok(Delivery::Sent { tx_hash })
}
