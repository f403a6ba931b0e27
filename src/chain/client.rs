//! Chain RPC access with timeouts and error mapping.
//!
//! # Responsibilities
//! - Connect to the network's JSON-RPC endpoint
//! - Resolve nonce, gas price and gas limit for assembly
//! - Fetch event logs and read contract state
//! - Submit signed transactions
//!
//! Everything downstream talks to the [`ChainRpc`] trait so tests can
//! substitute a scripted backend.

use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{BlockNumberOrTag, Filter, Log, TransactionRequest};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::error::{CliError, Result};

const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// The chain operations the CLI needs. One implementation speaks HTTP
/// JSON-RPC; tests provide scripted ones.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Chain id stamped into every transaction built for this network.
    fn chain_id(&self) -> u64;

    /// Latest block number.
    async fn block_number(&self) -> Result<u64>;

    /// Number of transactions ever sent from `address` (the next nonce).
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    /// Ask the network to estimate gas for a call. A revert during
    /// estimation surfaces here as [`CliError::EstimationFailed`].
    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> Result<u64>;

    /// Execute a read-only contract call and return the raw ABI output.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// Every log the contract at `address` ever emitted for one topic,
    /// from genesis to the latest block.
    async fn logs_for_topic(&self, address: Address, topic: B256) -> Result<Vec<Log>>;

    /// Submit a signed raw transaction, returning its hash.
    async fn send_raw(&self, raw: &[u8]) -> Result<TxHash>;
}

/// Production [`ChainRpc`] over an HTTP JSON-RPC endpoint.
#[derive(Clone)]
pub struct ChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    endpoint: String,
    chain_id: u64,
}

impl ChainClient {
    /// Connect to an HTTP endpoint. The chain id comes from config, not
    /// from the node; it is what gets signed into transactions.
    pub fn connect(endpoint: &str, chain_id: u64) -> Result<Self> {
        let url: url::Url = endpoint
            .parse()
            .map_err(|e| CliError::Rpc(format!("Invalid RPC URL '{}': {}", endpoint, e)))?;
        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        tracing::debug!(endpoint = %endpoint, chain_id = chain_id, "chain client initialized");

        Ok(Self {
            provider,
            endpoint: endpoint.to_string(),
            chain_id,
        })
    }
}

#[async_trait]
impl ChainRpc for ChainClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn block_number(&self) -> Result<u64> {
        let fut = self.provider.get_block_number();
        match timeout(RPC_TIMEOUT, fut).await {
            Ok(Ok(block)) => Ok(block),
            Ok(Err(e)) => Err(CliError::Rpc(format!("block number query failed: {}", e))),
            Err(_) => Err(CliError::Rpc("RPC timeout querying block number".to_string())),
        }
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        let fut = self.provider.get_transaction_count(address);
        match timeout(RPC_TIMEOUT, fut).await {
            Ok(Ok(count)) => Ok(count),
            Ok(Err(e)) => Err(CliError::Rpc(format!("nonce query failed: {}", e))),
            Err(_) => Err(CliError::Rpc("RPC timeout querying nonce".to_string())),
        }
    }

    async fn gas_price(&self) -> Result<u128> {
        let fut = self.provider.get_gas_price();
        match timeout(RPC_TIMEOUT, fut).await {
            Ok(Ok(price)) => Ok(price),
            Ok(Err(e)) => Err(CliError::Rpc(format!("gas price query failed: {}", e))),
            Err(_) => Err(CliError::Rpc("RPC timeout querying gas price".to_string())),
        }
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> Result<u64> {
        let request = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);
        let fut = self.provider.estimate_gas(request);
        match timeout(RPC_TIMEOUT, fut).await {
            Ok(Ok(gas)) => Ok(gas),
            Ok(Err(e)) => Err(CliError::EstimationFailed(e.to_string())),
            Err(_) => Err(CliError::EstimationFailed(
                "RPC timeout during gas estimation".to_string(),
            )),
        }
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default().with_to(to).with_input(data);
        let fut = self.provider.call(request);
        match timeout(RPC_TIMEOUT, fut).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(CliError::Rpc(format!("contract call failed: {}", e))),
            Err(_) => Err(CliError::Rpc("RPC timeout during contract call".to_string())),
        }
    }

    async fn logs_for_topic(&self, address: Address, topic: B256) -> Result<Vec<Log>> {
        let filter = Filter::new()
            .address(address)
            .from_block(0u64)
            .to_block(BlockNumberOrTag::Latest)
            .event_signature(topic);
        let fut = self.provider.get_logs(&filter);
        match timeout(RPC_TIMEOUT, fut).await {
            Ok(Ok(logs)) => Ok(logs),
            Ok(Err(e)) => Err(CliError::Rpc(format!("log query failed: {}", e))),
            Err(_) => Err(CliError::Rpc("RPC timeout querying logs".to_string())),
        }
    }

    async fn send_raw(&self, raw: &[u8]) -> Result<TxHash> {
        let fut = self.provider.send_raw_transaction(raw);
        match timeout(RPC_TIMEOUT, fut).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(CliError::BroadcastFailure(e.to_string())),
            Err(_) => Err(CliError::BroadcastFailure(
                "RPC timeout during broadcast; the transaction may still land".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("endpoint", &self.endpoint)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
