//! Chain access: RPC client and contract ABI bindings.

pub mod client;
pub mod contracts;

pub use client::{ChainClient, ChainRpc};
