//! Shared error type across netfence crates.
//!
//! Errors exist only at the text boundary: parsing CIDR prefixes, parsing
//! composite dial addresses, and loading configuration. Gate operations
//! themselves never fail — malformed queries resolve to the configured
//! default action and unknown prefixes are silent no-ops.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, NetFenceError>;

/// Unified error type used by core and gate.
#[derive(Debug, Error)]
pub enum NetFenceError {
    #[error("invalid prefix: {0}")]
    InvalidPrefix(String),
    #[error("invalid address: {0}")]
    InvalidAddr(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
}
