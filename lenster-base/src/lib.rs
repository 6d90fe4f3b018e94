//! This crate contains the shared plumbing of the Lenster client: settings,
//! tracing, and the per-user session.

#![warn(missing_docs)]
#![deny(clippy::unwrap_used, clippy::panic)]
#![forbid(unsafe_code)]

pub use session::*;
pub use settings::Settings;

/// Settings and configuration
pub mod settings;

mod session;
