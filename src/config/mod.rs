//! Configuration management.
//!
//! # Data Flow
//! ```text
//! built-in defaults (or TOML file)
//!     → loader.rs (parse & deserialize)
//!     → semantic validation
//!     → AppConfig (validated, immutable)
//!     → network selected once per invocation
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; one network is picked per run
//! - All fields have defaults so a config file is optional
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{AppConfig, NetworkConfig, NetworkName, Networks, TokenConfig};
