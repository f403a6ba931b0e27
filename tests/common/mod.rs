//! Scripted collaborators for the integration suite.
//!
//! The RPC surface and the prompt are traits, so these tests drive the
//! real command pipeline against in-memory implementations and assert
//! on what actually went over the wire.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{address, keccak256, Address, Bytes, LogData, TxHash, B256, U256};
use alloy::rpc::types::Log;
use alloy::sol_types::{SolEvent, SolValue};
use async_trait::async_trait;
use zeroize::Zeroizing;

use stablectl::chain::contracts::{AddMember, MintProposed, MintRejected, MintSent, RemoveMember};
use stablectl::chain::ChainRpc;
use stablectl::commands::{Context, NetworkArgs, SigningArgs};
use stablectl::config::{NetworkConfig, NetworkName};
use stablectl::error::{CliError, Result};
use stablectl::prompt::Prompt;
use stablectl::signing::SigMethod;

/// First Anvil development account.
pub const TEST_PRIVKEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub const TOKEN: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");
pub const ISSUER: Address = address!("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");

pub const CHAIN_ID: u64 = 11_155_111;

struct RpcState {
    chain_id: u64,
    block: Mutex<u64>,
    nonce: u64,
    gas_price: u128,
    calls: Mutex<HashMap<Bytes, Bytes>>,
    logs: Mutex<HashMap<B256, Vec<Log>>>,
    sent: Mutex<Vec<Vec<u8>>>,
    estimate_error: Mutex<Option<String>>,
    broadcast_error: Mutex<Option<String>>,
    estimate_calls: AtomicUsize,
}

/// In-memory [`ChainRpc`]. Cloning shares state, so a test can keep a
/// handle for scripting and assertions after the context takes its
/// copy.
#[derive(Clone)]
pub struct ScriptedRpc {
    state: Arc<RpcState>,
}

impl ScriptedRpc {
    pub fn new(chain_id: u64) -> Self {
        Self {
            state: Arc::new(RpcState {
                chain_id,
                block: Mutex::new(100),
                nonce: 7,
                gas_price: 1_000_000_000,
                calls: Mutex::new(HashMap::new()),
                logs: Mutex::new(HashMap::new()),
                sent: Mutex::new(Vec::new()),
                estimate_error: Mutex::new(None),
                broadcast_error: Mutex::new(None),
                estimate_calls: AtomicUsize::new(0),
            }),
        }
    }

    /// Fix the response for an exact eth_call payload.
    pub fn script_call(&self, calldata: impl Into<Bytes>, output: impl Into<Bytes>) {
        self.state
            .calls
            .lock()
            .unwrap()
            .insert(calldata.into(), output.into());
    }

    pub fn push_log(&self, log: Log) {
        let Some(topic) = log.topics().first().copied() else {
            panic!("scripted log needs a topic");
        };
        self.state
            .logs
            .lock()
            .unwrap()
            .entry(topic)
            .or_default()
            .push(log);
    }

    pub fn set_block(&self, block: u64) {
        *self.state.block.lock().unwrap() = block;
    }

    pub fn fail_estimation(&self, message: &str) {
        *self.state.estimate_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn pass_estimation(&self) {
        *self.state.estimate_error.lock().unwrap() = None;
    }

    pub fn fail_broadcast(&self, message: &str) {
        *self.state.broadcast_error.lock().unwrap() = Some(message.to_string());
    }

    /// Raw transactions accepted so far.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn estimate_calls(&self) -> usize {
        self.state.estimate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainRpc for ScriptedRpc {
    fn chain_id(&self) -> u64 {
        self.state.chain_id
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(*self.state.block.lock().unwrap())
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64> {
        Ok(self.state.nonce)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(self.state.gas_price)
    }

    async fn estimate_gas(&self, _from: Address, _to: Address, _data: Bytes) -> Result<u64> {
        self.state.estimate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.state.estimate_error.lock().unwrap().clone() {
            return Err(CliError::EstimationFailed(message));
        }
        Ok(60_000)
    }

    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes> {
        let calls = self.state.calls.lock().unwrap();
        calls
            .get(&data)
            .cloned()
            .ok_or_else(|| CliError::Rpc(format!("unscripted call: {}", data)))
    }

    async fn logs_for_topic(&self, _address: Address, topic: B256) -> Result<Vec<Log>> {
        Ok(self
            .state
            .logs
            .lock()
            .unwrap()
            .get(&topic)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_raw(&self, raw: &[u8]) -> Result<TxHash> {
        if let Some(message) = self.state.broadcast_error.lock().unwrap().clone() {
            return Err(CliError::BroadcastFailure(message));
        }
        self.state.sent.lock().unwrap().push(raw.to_vec());
        Ok(keccak256(raw))
    }
}

/// Prompt that answers from a script instead of a terminal.
#[derive(Default)]
pub struct ScriptedPrompt {
    secret: Option<String>,
    pick: usize,
    answers: Mutex<VecDeque<String>>,
    confirmations: AtomicUsize,
}

impl ScriptedPrompt {
    /// A prompt that fails on any interaction.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn with_secret(secret: &str) -> Self {
        Self {
            secret: Some(secret.to_string()),
            ..Self::default()
        }
    }

    /// How many times the confirmation line was read.
    pub fn confirmations(&self) -> usize {
        self.confirmations.load(Ordering::SeqCst)
    }
}

impl Prompt for ScriptedPrompt {
    fn secret(&self, _message: &str) -> Result<Zeroizing<String>> {
        match &self.secret {
            Some(secret) => Ok(Zeroizing::new(secret.clone())),
            None => Err(CliError::Prompt("no scripted secret".to_string())),
        }
    }

    fn select(&self, _message: &str, _items: &[String]) -> Result<usize> {
        Ok(self.pick)
    }

    fn read_line(&self, _message: &str) -> Result<String> {
        self.confirmations.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CliError::Prompt("no scripted answer".to_string()))
    }
}

/// Context over a scripted RPC, pointed at the fixed test contracts.
pub fn test_context(rpc: &ScriptedRpc) -> Context {
    Context {
        rpc: Box::new(rpc.clone()),
        network: NetworkConfig {
            endpoint: "http://localhost:8545".to_string(),
            chain_id: rpc.chain_id(),
            token_address: TOKEN,
            issuer_address: ISSUER,
        },
        decimals: 6,
    }
}

pub fn network_args() -> NetworkArgs {
    NetworkArgs {
        network: NetworkName::Sepolia,
    }
}

/// Signing flags for the local key path with the test key baked in.
pub fn privkey_signing_args(skip_confirm: bool, no_broadcast: bool) -> SigningArgs {
    SigningArgs {
        sigmethod: SigMethod::Privkey,
        skip_confirm,
        no_broadcast,
        nonce: None,
        gas_price_gwei: None,
        privkey: Some(TEST_PRIVKEY.to_string()),
        hdw_path: None,
    }
}

pub fn log_at(block: u64, address: Address, topics: Vec<B256>, data: Bytes) -> Log {
    Log {
        inner: alloy::primitives::Log {
            address,
            data: LogData::new_unchecked(topics, data),
        },
        block_hash: None,
        block_number: Some(block),
        block_timestamp: None,
        transaction_hash: None,
        transaction_index: None,
        log_index: None,
        removed: false,
    }
}

pub fn member_added(block: u64, account: Address) -> Log {
    log_at(
        block,
        ISSUER,
        vec![AddMember::SIGNATURE_HASH, account.into_word()],
        Bytes::new(),
    )
}

pub fn member_removed(block: u64, account: Address) -> Log {
    log_at(
        block,
        ISSUER,
        vec![RemoveMember::SIGNATURE_HASH, account.into_word()],
        Bytes::new(),
    )
}

pub fn mint_proposed(block: u64, proposer: Address, index: u64) -> Log {
    log_at(
        block,
        ISSUER,
        vec![MintProposed::SIGNATURE_HASH, proposer.into_word()],
        U256::from(index).abi_encode().into(),
    )
}

pub fn mint_rejected(block: u64, sender: Address, index: u64) -> Log {
    log_at(
        block,
        ISSUER,
        vec![MintRejected::SIGNATURE_HASH, sender.into_word()],
        U256::from(index).abi_encode().into(),
    )
}

pub fn mint_sent(block: u64, sender: Address, index: u64) -> Log {
    log_at(
        block,
        ISSUER,
        vec![MintSent::SIGNATURE_HASH, sender.into_word()],
        U256::from(index).abi_encode().into(),
    )
}
