//! Authorize-and-broadcast flows exercised end to end over scripted
//! collaborators: what reaches the wire, and what never does.

mod common;

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{address, keccak256, Address, TxKind};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;

use stablectl::chain::contracts::{isMemberCall, ownerCall, transferCall};
use stablectl::commands::{self, MemberAddArgs, MintRejectArgs, TransferArgs};
use stablectl::error::{CliError, Result};
use stablectl::signing::{DeviceSignature, DeviceTransport, HardwareSigner, Signer};
use stablectl::tx::{self, Overrides};

const RECIPIENT: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

fn decode_legacy(raw: &[u8]) -> TxLegacy {
    let envelope = TxEnvelope::decode_2718(&mut &raw[..]).unwrap();
    let TxEnvelope::Legacy(signed) = envelope else {
        panic!("expected a legacy transaction");
    };
    signed.tx().clone()
}

fn transfer_args(skip_confirm: bool, no_broadcast: bool) -> TransferArgs {
    TransferArgs {
        network: common::network_args(),
        signing: common::privkey_signing_args(skip_confirm, no_broadcast),
        to: RECIPIENT,
        amount: "154.23".to_string(),
    }
}

#[tokio::test]
async fn test_dry_run_never_broadcasts() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::silent();

    commands::token::transfer(&ctx, &transfer_args(false, true), &prompt)
        .await
        .unwrap();

    assert!(rpc.sent().is_empty(), "dry run must not broadcast");
    assert_eq!(
        prompt.confirmations(),
        0,
        "dry run short-circuits before the confirmation gate"
    );
}

#[tokio::test]
async fn test_declined_confirmation_aborts() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::with_answers(&["n"]);

    commands::token::transfer(&ctx, &transfer_args(false, false), &prompt)
        .await
        .unwrap();

    assert_eq!(prompt.confirmations(), 1);
    assert!(rpc.sent().is_empty(), "a declined transaction must not broadcast");
}

#[tokio::test]
async fn test_confirmed_transfer_reaches_the_wire_intact() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::with_answers(&["YES"]);

    commands::token::transfer(&ctx, &transfer_args(false, false), &prompt)
        .await
        .unwrap();

    let sent = rpc.sent();
    assert_eq!(sent.len(), 1);

    // The broadcast bytes decode back to the call we asked for, signed
    // by the key we provided, with fields the network resolved.
    assert_eq!(tx::recover_sender(&sent[0]).unwrap(), common::TEST_ADDRESS);
    let decoded = decode_legacy(&sent[0]);
    assert_eq!(decoded.to, TxKind::Call(common::TOKEN));
    assert!(decoded.input.starts_with(&transferCall::SELECTOR));
    assert_eq!(decoded.nonce, 7);
    assert_eq!(decoded.gas_price, 1_000_000_000);
    assert_eq!(decoded.chain_id, Some(common::CHAIN_ID));
}

#[tokio::test]
async fn test_skip_confirm_broadcasts_without_prompting() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::silent();

    commands::token::transfer(&ctx, &transfer_args(true, false), &prompt)
        .await
        .unwrap();

    assert_eq!(rpc.sent().len(), 1);
    assert_eq!(prompt.confirmations(), 0);
}

#[tokio::test]
async fn test_overrides_flow_through_to_the_wire() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::silent();

    let mut args = transfer_args(true, false);
    args.signing.nonce = Some(42);
    args.signing.gas_price_gwei = Some("2.5".to_string());

    commands::token::transfer(&ctx, &args, &prompt).await.unwrap();

    let sent = rpc.sent();
    let decoded = decode_legacy(&sent[0]);
    assert_eq!(decoded.nonce, 42);
    assert_eq!(decoded.gas_price, 2_500_000_000);
}

#[tokio::test]
async fn test_broadcast_failure_surfaces_verbatim() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::silent();
    rpc.fail_broadcast("nonce too low");

    let err = commands::token::transfer(&ctx, &transfer_args(true, false), &prompt)
        .await
        .unwrap_err();

    match err {
        CliError::BroadcastFailure(message) => assert_eq!(message, "nonce too low"),
        other => panic!("expected BroadcastFailure, got {:?}", other),
    }
    assert!(rpc.sent().is_empty());
}

/// Device that shows one identity but signs with another key, the
/// exact failure self-verification exists to catch.
struct TwoFacedDevice {
    reported: Address,
    key: PrivateKeySigner,
}

#[async_trait]
impl DeviceTransport for TwoFacedDevice {
    async fn list_devices(&mut self) -> Result<Vec<String>> {
        Ok(vec!["Nano S".to_string()])
    }

    async fn get_address(&mut self, _path: &str) -> Result<Address> {
        Ok(self.reported)
    }

    async fn sign_transaction(&mut self, _path: &str, tx: &TxLegacy) -> Result<DeviceSignature> {
        let payload = tx.encoded_for_signing();
        let signature = self
            .key
            .sign_hash_sync(&keccak256(&payload))
            .map_err(|e| CliError::SigningRejected(e.to_string()))?;
        Ok(DeviceSignature {
            v: u64::from(signature.v()),
            r: signature.r(),
            s: signature.s(),
        })
    }
}

#[tokio::test]
async fn test_verification_mismatch_blocks_broadcast() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let prompt = common::ScriptedPrompt::silent();

    let device = TwoFacedDevice {
        reported: RECIPIENT,
        key: common::TEST_PRIVKEY.parse().unwrap(),
    };
    let hardware = HardwareSigner::connect(Box::new(device), Some("m/44'/60'/0'/0/0"), &prompt)
        .await
        .unwrap();
    let mut signer = Signer::Hardware(hardware);

    let data = transferCall {
        to: RECIPIENT,
        value: alloy::primitives::U256::from(1u64),
    }
    .abi_encode();
    let err = tx::authorize(
        &rpc,
        &mut signer,
        common::TOKEN,
        data.into(),
        &Overrides::default(),
    )
    .await
    .unwrap_err();

    match err {
        CliError::VerificationMismatch {
            intended,
            recovered,
        } => {
            assert_eq!(intended, RECIPIENT);
            assert_eq!(recovered, common::TEST_ADDRESS);
        }
        other => panic!("expected VerificationMismatch, got {:?}", other),
    }
    assert!(rpc.sent().is_empty(), "mismatched bytes must never broadcast");
}

#[tokio::test]
async fn test_member_add_rejects_non_owner_before_any_assembly() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::silent();

    rpc.script_call(ownerCall {}.abi_encode(), RECIPIENT.abi_encode());

    let args = MemberAddArgs {
        network: common::network_args(),
        signing: common::privkey_signing_args(true, false),
        address: RECIPIENT,
    };
    commands::member::add(&ctx, &args, &prompt).await.unwrap();

    assert_eq!(rpc.estimate_calls(), 0, "guard must fire before estimation");
    assert!(rpc.sent().is_empty());
}

#[tokio::test]
async fn test_member_add_by_owner_broadcasts() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::silent();

    rpc.script_call(ownerCall {}.abi_encode(), common::TEST_ADDRESS.abi_encode());

    let args = MemberAddArgs {
        network: common::network_args(),
        signing: common::privkey_signing_args(true, false),
        address: RECIPIENT,
    };
    commands::member::add(&ctx, &args, &prompt).await.unwrap();

    assert_eq!(rpc.sent().len(), 1);
    assert_eq!(
        tx::recover_sender(&rpc.sent()[0]).unwrap(),
        common::TEST_ADDRESS
    );
}

#[tokio::test]
async fn test_mint_reject_requires_membership() {
    let rpc = common::ScriptedRpc::new(common::CHAIN_ID);
    let ctx = common::test_context(&rpc);
    let prompt = common::ScriptedPrompt::silent();

    rpc.script_call(
        isMemberCall {
            account: common::TEST_ADDRESS,
        }
        .abi_encode(),
        false.abi_encode(),
    );

    let args = MintRejectArgs {
        network: common::network_args(),
        signing: common::privkey_signing_args(true, false),
        index: alloy::primitives::U256::ZERO,
    };
    commands::mint::reject(&ctx, &args, &prompt).await.unwrap();

    assert_eq!(rpc.estimate_calls(), 0);
    assert!(rpc.sent().is_empty());
}
