//! Configuration schema definitions.
//!
//! Built-in defaults cover the public deployments; a TOML file can
//! replace the token settings or a whole network table, most usefully
//! to point mainnet at a real deployment.

use alloy::primitives::{address, Address};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Root configuration for the CLI.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Token-wide settings shared by every deployment.
    pub token: TokenConfig,

    /// Per-network deployment settings.
    pub networks: Networks,
}

/// Token-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Decimal places the token contract uses for its base units.
    pub decimals: u8,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self { decimals: 6 }
    }
}

/// The networks the contract pair is deployed to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Networks {
    pub mainnet: NetworkConfig,
    pub sepolia: NetworkConfig,
}

impl Default for Networks {
    fn default() -> Self {
        Self {
            mainnet: NetworkConfig {
                endpoint: "https://ethereum-rpc.publicnode.com".to_string(),
                chain_id: 1,
                // Mainnet addresses are not baked in; set them in the
                // config file before use.
                token_address: Address::ZERO,
                issuer_address: Address::ZERO,
            },
            sepolia: NetworkConfig {
                endpoint: "https://ethereum-sepolia-rpc.publicnode.com".to_string(),
                chain_id: 11_155_111,
                token_address: address!("0xFBfd5d812AC8305B5AA0B64947b4CBdD83a8B46E"),
                issuer_address: address!("0x9Fdd760DBF679eF204C4DBEB24dF2f721f520165"),
            },
        }
    }
}

/// A single network: RPC endpoint, chain id and the contract pair.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// HTTP JSON-RPC endpoint.
    pub endpoint: String,

    /// Chain id stamped into every signed transaction.
    pub chain_id: u64,

    /// Deployed token contract.
    pub token_address: Address,

    /// Deployed issuance governor contract.
    pub issuer_address: Address,
}

/// Named network selector, shared by the CLI surface and the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkName {
    Mainnet,
    Sepolia,
}

impl std::fmt::Display for NetworkName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkName::Mainnet => write!(f, "mainnet"),
            NetworkName::Sepolia => write!(f, "sepolia"),
        }
    }
}

impl AppConfig {
    /// The deployment settings for a named network.
    pub fn network(&self, name: NetworkName) -> &NetworkConfig {
        match name {
            NetworkName::Mainnet => &self.networks.mainnet,
            NetworkName::Sepolia => &self.networks.sepolia,
        }
    }
}
