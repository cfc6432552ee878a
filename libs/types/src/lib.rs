//! Types library for the treasury system
//!
//! This library provides the core type definitions shared across the
//! treasury crates, ensuring type safety and a single canonical byte
//! encoding for everything that gets hashed or signed.
//!
//! # Modules
//! - `address`: 32-byte account identifiers (also ed25519 verifying keys)
//! - `currency`: accepted asset identifiers (native coin or token address)

pub mod address;
pub mod currency;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::address::*;
    pub use crate::currency::*;
}
