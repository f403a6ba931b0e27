//! Command surface and dispatch.
//!
//! # Responsibilities
//! - Define the clap command tree and shared flag groups
//! - Build the per-invocation [`Context`] (config, network, RPC client)
//! - Resolve the signer once and hand it to the command body
//!
//! Command bodies live in the sibling modules and only see the
//! [`Context`], their own flags and the prompt. Nothing here touches
//! the chain directly.

pub mod member;
pub mod mint;
pub mod token;

use std::path::{Path, PathBuf};

use alloy::primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};

use crate::chain::{ChainClient, ChainRpc};
use crate::config::{load_or_default, NetworkConfig, NetworkName};
use crate::error::{CliError, Result};
use crate::prompt::Prompt;
use crate::signing::{open_device_transport, HardwareSigner, LocalSigner, SigMethod, Signer};
use crate::tx::{BroadcastOptions, Overrides};
use crate::units::gwei_to_wei;

/// Operations CLI for a stablecoin token and its issuance governor.
#[derive(Debug, Parser)]
#[command(name = "stablectl", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file. Built-in defaults apply when
    /// omitted.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the token's total supply
    Supply(SupplyArgs),
    /// Transfer tokens from the signer to another address
    Transfer(TransferArgs),
    /// Burn tokens held by the signer
    Burn(BurnArgs),
    /// Mint tokens directly on the token contract
    Mint(MintArgs),
    /// Issuance governor operations
    #[command(subcommand)]
    Issuer(IssuerCommands),
}

#[derive(Debug, Subcommand)]
pub enum IssuerCommands {
    /// Issuer membership operations
    #[command(subcommand)]
    Member(MemberCommands),
    /// Time-locked mint proposal operations
    #[command(subcommand)]
    Mint(MintCommands),
}

#[derive(Debug, Subcommand)]
pub enum MemberCommands {
    /// Add a member to the issuer
    Add(MemberAddArgs),
    /// Remove a member from the issuer
    Remove(MemberRemoveArgs),
    /// List the current issuer members
    List(IssuerListArgs),
}

#[derive(Debug, Subcommand)]
pub enum MintCommands {
    /// Propose a time-locked mint
    Propose(MintProposeArgs),
    /// Reject a pending mint proposal
    Reject(MintRejectArgs),
    /// Execute a pending mint proposal past its time lock
    Send(MintSendArgs),
    /// List pending mint proposals
    List(IssuerListArgs),
}

/// Flags every command carries.
#[derive(Debug, Args)]
pub struct NetworkArgs {
    /// Ethereum network to use
    #[arg(long, value_enum, default_value_t = NetworkName::Sepolia)]
    pub network: NetworkName,
}

/// Flags every signing command carries.
#[derive(Debug, Args)]
pub struct SigningArgs {
    /// Signature method for signing the transaction
    #[arg(long, value_enum)]
    pub sigmethod: SigMethod,

    /// Skip the confirmation and directly broadcast the transaction.
    /// Useful for non-interactive use.
    #[arg(long)]
    pub skip_confirm: bool,

    /// Sign but do not broadcast the transaction. Output the signed
    /// transaction to stdout.
    #[arg(long)]
    pub no_broadcast: bool,

    /// Override the default behavior of getting the next nonce by using
    /// a user specified nonce. Useful for retrying or queuing
    /// transactions.
    #[arg(long)]
    pub nonce: Option<u64>,

    /// Override the default behavior of determining gas price based on
    /// previous few blocks by using a user specified gas price in Gwei.
    /// 1 Gwei is 1e9 Wei (a giga-wei).
    #[arg(long, value_name = "GWEI")]
    pub gas_price_gwei: Option<String>,

    /// The private key in plaintext used for signing the transaction.
    /// If provided no longer prompts the user. Useful for
    /// non-interactive use.
    #[arg(long, hide = true)]
    pub privkey: Option<String>,

    /// Specify a custom HD wallet derivation path, or just skip the
    /// prompt for non-interactive signing.
    #[arg(long, value_name = "PATH")]
    pub hdw_path: Option<String>,
}

impl SigningArgs {
    /// Nonce and gas price overrides in wire units. Gas price parsing
    /// happens here so malformed input fails before any prompt or
    /// network traffic.
    pub fn overrides(&self) -> Result<Overrides> {
        let gas_price_wei = match &self.gas_price_gwei {
            Some(gwei) => Some(gwei_to_wei(gwei)?),
            None => None,
        };
        Ok(Overrides {
            nonce: self.nonce,
            gas_price_wei,
        })
    }

    /// Gating flags for the broadcast stage.
    pub fn broadcast_options(&self) -> BroadcastOptions {
        BroadcastOptions {
            skip_confirm: self.skip_confirm,
            no_broadcast: self.no_broadcast,
        }
    }
}

#[derive(Debug, Args)]
pub struct SupplyArgs {
    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Debug, Args)]
pub struct TransferArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub signing: SigningArgs,

    /// The address to transfer to
    #[arg(long)]
    pub to: Address,

    /// The amount of transfer (e.g. 154.23)
    #[arg(long)]
    pub amount: String,
}

#[derive(Debug, Args)]
pub struct BurnArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub signing: SigningArgs,

    /// The amount of burn (e.g. 154.23)
    #[arg(long)]
    pub amount: String,
}

#[derive(Debug, Args)]
pub struct MintArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub signing: SigningArgs,

    /// The recipient of the minted tokens
    #[arg(long)]
    pub to: Address,

    /// The amount to mint (e.g. 154.23)
    #[arg(long)]
    pub amount: String,
}

#[derive(Debug, Args)]
pub struct MemberAddArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub signing: SigningArgs,

    /// The new issuance member to add
    #[arg(long)]
    pub address: Address,
}

#[derive(Debug, Args)]
pub struct MemberRemoveArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub signing: SigningArgs,

    /// The issuance member to remove
    #[arg(long)]
    pub address: Address,
}

#[derive(Debug, Args)]
pub struct IssuerListArgs {
    #[command(flatten)]
    pub network: NetworkArgs,
}

#[derive(Debug, Args)]
pub struct MintProposeArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub signing: SigningArgs,

    /// The address to issue new tokens to, defaults to self
    #[arg(long)]
    pub to: Option<Address>,

    /// The amount of propose (e.g. 154.23)
    #[arg(long)]
    pub amount: String,
}

#[derive(Debug, Args)]
pub struct MintRejectArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub signing: SigningArgs,

    /// The index of the pending mint to reject
    #[arg(long)]
    pub index: U256,
}

#[derive(Debug, Args)]
pub struct MintSendArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    #[command(flatten)]
    pub signing: SigningArgs,

    /// The index of the pending mint to send
    #[arg(long)]
    pub index: U256,
}

/// Everything a command body needs besides its own flags.
pub struct Context {
    pub rpc: Box<dyn ChainRpc>,
    pub network: NetworkConfig,
    pub decimals: u8,
}

impl Context {
    /// Load configuration, pick the network and connect the RPC client.
    pub fn build(config_path: Option<&Path>, network: NetworkName) -> Result<Self> {
        let config = load_or_default(config_path)?;
        let network_config = config.network(network).clone();

        if network_config.token_address == Address::ZERO
            || network_config.issuer_address == Address::ZERO
        {
            return Err(CliError::Validation(format!(
                "network {} has no contract addresses configured; set them in the config file",
                network
            )));
        }

        let client = ChainClient::connect(&network_config.endpoint, network_config.chain_id)?;

        tracing::debug!(
            network = %network,
            endpoint = %network_config.endpoint,
            "context ready"
        );

        Ok(Self {
            rpc: Box::new(client),
            network: network_config,
            decimals: config.token.decimals,
        })
    }

    pub fn rpc(&self) -> &dyn ChainRpc {
        self.rpc.as_ref()
    }
}

/// Resolve the signer once per invocation from the signing flags. The
/// address shown in guards and receipts is the address that signs.
pub async fn resolve_signer(
    args: &SigningArgs,
    chain_id: u64,
    prompt: &dyn Prompt,
) -> Result<Signer> {
    match args.sigmethod {
        SigMethod::Privkey => {
            let local = LocalSigner::acquire(args.privkey.as_deref(), prompt)?;
            Ok(Signer::Local(local))
        }
        SigMethod::Ledger => {
            let transport = open_device_transport(chain_id)?;
            let hardware =
                HardwareSigner::connect(transport, args.hdw_path.as_deref(), prompt).await?;
            Ok(Signer::Hardware(hardware))
        }
    }
}

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli, prompt: &dyn Prompt) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Supply(args) => {
            let ctx = Context::build(config_path, args.network.network)?;
            token::supply(&ctx).await
        }
        Commands::Transfer(args) => {
            let ctx = Context::build(config_path, args.network.network)?;
            token::transfer(&ctx, &args, prompt).await
        }
        Commands::Burn(args) => {
            let ctx = Context::build(config_path, args.network.network)?;
            token::burn(&ctx, &args, prompt).await
        }
        Commands::Mint(args) => {
            let ctx = Context::build(config_path, args.network.network)?;
            token::mint(&ctx, &args, prompt).await
        }
        Commands::Issuer(issuer) => match issuer {
            IssuerCommands::Member(member) => match member {
                MemberCommands::Add(args) => {
                    let ctx = Context::build(config_path, args.network.network)?;
                    member::add(&ctx, &args, prompt).await
                }
                MemberCommands::Remove(args) => {
                    let ctx = Context::build(config_path, args.network.network)?;
                    member::remove(&ctx, &args, prompt).await
                }
                MemberCommands::List(args) => {
                    let ctx = Context::build(config_path, args.network.network)?;
                    member::list(&ctx).await
                }
            },
            IssuerCommands::Mint(mint) => match mint {
                MintCommands::Propose(args) => {
                    let ctx = Context::build(config_path, args.network.network)?;
                    mint::propose(&ctx, &args, prompt).await
                }
                MintCommands::Reject(args) => {
                    let ctx = Context::build(config_path, args.network.network)?;
                    mint::reject(&ctx, &args, prompt).await
                }
                MintCommands::Send(args) => {
                    let ctx = Context::build(config_path, args.network.network)?;
                    mint::send(&ctx, &args, prompt).await
                }
                MintCommands::List(args) => {
                    let ctx = Context::build(config_path, args.network.network)?;
                    mint::list(&ctx).await
                }
            },
        },
    }
}
