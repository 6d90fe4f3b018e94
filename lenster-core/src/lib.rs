//! This crate contains core primitives, traits, and types for the Lenster
//! publishing client.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]
#![forbid(unsafe_code)]

pub use error::*;
pub use traits::*;
pub use types::*;

/// Re-export of the ethereum primitive types used across the workspace
pub use ethers_core::types::{Address, Bytes, Signature, H256, U256};

mod error;
/// Async traits for the external services the pipeline talks to
pub mod traits;
/// Core data structures
pub mod types;
