//! The authorize-and-broadcast pipeline.
//!
//! ```text
//! calldata → assembler (estimate, nonce, gas price)
//!          → signer (local key or device)
//!          → self-verification (recover == intended)
//!          → dry-run gate → confirmation gate → single submission
//! ```

pub mod assembler;
pub mod authorize;
pub mod broadcast;

pub use assembler::{assemble, Overrides};
pub use authorize::{authorize, recover_sender, AuthorizedTx};
pub use broadcast::{deliver, BroadcastOptions, CallSummary, Delivery};
