//! Assembly of broadcast-ready unsigned transactions.

use alloy::consensus::TxLegacy;
use alloy::primitives::{Address, Bytes, TxKind, U256};

use crate::chain::ChainRpc;
use crate::error::Result;

/// User-supplied replacements for network-resolved fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// Use this nonce instead of the account's next one.
    pub nonce: Option<u64>,
    /// Use this gas price (wei) instead of the network suggestion.
    pub gas_price_wei: Option<u128>,
}

/// Resolve gas, nonce and price for a contract call and stamp in the
/// network's chain id. Estimation runs first: a call the network
/// rejects is abandoned before any signature is requested.
pub async fn assemble(
    rpc: &dyn ChainRpc,
    from: Address,
    to: Address,
    data: Bytes,
    overrides: &Overrides,
) -> Result<TxLegacy> {
    let gas_limit = rpc.estimate_gas(from, to, data.clone()).await?;

    let nonce = match overrides.nonce {
        Some(nonce) => nonce,
        None => rpc.transaction_count(from).await?,
    };

    let gas_price = match overrides.gas_price_wei {
        Some(price) => price,
        None => rpc.gas_price().await?,
    };

    tracing::debug!(
        nonce = nonce,
        gas_limit = gas_limit,
        gas_price = gas_price,
        "transaction assembled"
    );

    Ok(TxLegacy {
        chain_id: Some(rpc.chain_id()),
        nonce,
        gas_price,
        gas_limit,
        to: TxKind::Call(to),
        value: U256::ZERO,
        input: data,
    })
}
