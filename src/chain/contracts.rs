//! ABI bindings for the token and its issuance governor.
//!
//! The CLI only ever talks to these two contracts, so the surface here
//! is the full set of calls and events the commands need, nothing more.

use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolValue};

use crate::chain::ChainRpc;
use crate::error::{CliError, Result};

sol! {
    // ---- Token ----

    function totalSupply() external view returns (uint256);
    function transfer(address to, uint256 value) external returns (bool);
    function burn(uint256 value) external;
    function mintTo(address to, uint256 value) external;

    // ---- Issuance governor ----

    function owner() external view returns (address);
    function isMember(address account) external view returns (bool);
    function numMembers() external view returns (uint256);
    function addMember(address account) external;
    function removeMember(address account) external;
    function proposeMint(address recipient, uint256 value) external;
    function rejectMint(uint256 pendingMintIndex) external;
    function sendMint(uint256 pendingMintIndex) external;
    function pendingMints(uint256 index) external view returns (address recipient, uint256 value, uint256 canMintAtBlock);
    function pendingMintsIndex() external view returns (uint256);

    /// Emitted when an account joins the issuer membership.
    #[derive(Debug)]
    event AddMember(address indexed account);

    /// Emitted when an account leaves the issuer membership.
    #[derive(Debug)]
    event RemoveMember(address indexed account);

    /// Emitted when a member proposes a time-locked mint.
    #[derive(Debug)]
    event MintProposed(address indexed proposer, uint256 pendingMintIndex);

    /// Emitted when a pending mint is rejected and removed.
    #[derive(Debug)]
    event MintRejected(address indexed sender, uint256 pendingMintIndex);

    /// Emitted when a pending mint is executed and removed.
    #[derive(Debug)]
    event MintSent(address indexed sender, uint256 pendingMintIndex);
}

/// On-chain record of one queued mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMintInfo {
    pub recipient: Address,
    pub value: U256,
    pub can_mint_at_block: U256,
}

pub async fn total_supply(rpc: &dyn ChainRpc, token: Address) -> Result<U256> {
    let output = rpc.call(token, totalSupplyCall {}.abi_encode().into()).await?;
    let (supply,) = <(U256,)>::abi_decode(&output)
        .map_err(|e| CliError::Rpc(format!("could not decode totalSupply return: {}", e)))?;
    Ok(supply)
}

pub async fn owner(rpc: &dyn ChainRpc, issuer: Address) -> Result<Address> {
    let output = rpc.call(issuer, ownerCall {}.abi_encode().into()).await?;
    let (owner,) = <(Address,)>::abi_decode(&output)
        .map_err(|e| CliError::Rpc(format!("could not decode owner return: {}", e)))?;
    Ok(owner)
}

pub async fn is_member(rpc: &dyn ChainRpc, issuer: Address, account: Address) -> Result<bool> {
    let output = rpc
        .call(issuer, isMemberCall { account }.abi_encode().into())
        .await?;
    let (member,) = <(bool,)>::abi_decode(&output)
        .map_err(|e| CliError::Rpc(format!("could not decode isMember return: {}", e)))?;
    Ok(member)
}

pub async fn num_members(rpc: &dyn ChainRpc, issuer: Address) -> Result<U256> {
    let output = rpc.call(issuer, numMembersCall {}.abi_encode().into()).await?;
    let (count,) = <(U256,)>::abi_decode(&output)
        .map_err(|e| CliError::Rpc(format!("could not decode numMembers return: {}", e)))?;
    Ok(count)
}

pub async fn pending_mint(
    rpc: &dyn ChainRpc,
    issuer: Address,
    index: U256,
) -> Result<PendingMintInfo> {
    let output = rpc
        .call(issuer, pendingMintsCall { index }.abi_encode().into())
        .await?;
    let (recipient, value, can_mint_at_block) = <(Address, U256, U256)>::abi_decode(&output)
        .map_err(|e| CliError::Rpc(format!("could not decode pendingMints return: {}", e)))?;
    Ok(PendingMintInfo {
        recipient,
        value,
        can_mint_at_block,
    })
}

pub async fn pending_mints_index(rpc: &dyn ChainRpc, issuer: Address) -> Result<U256> {
    let output = rpc
        .call(issuer, pendingMintsIndexCall {}.abi_encode().into())
        .await?;
    let (index,) = <(U256,)>::abi_decode(&output)
        .map_err(|e| CliError::Rpc(format!("could not decode pendingMintsIndex return: {}", e)))?;
    Ok(index)
}
