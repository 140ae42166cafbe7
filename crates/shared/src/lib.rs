//! # TapNex Shared
//!
//! Common types used across all TapNex access crates: the closed role set,
//! identities issued by the auth service, application profiles, the ticketing
//! records the dashboard reads, configuration and error types.

pub mod config;
pub mod error;
pub mod identity;
pub mod profile;
pub mod records;
pub mod role;

// Re-exports
pub use config::*;
pub use error::*;
pub use identity::*;
pub use profile::*;
pub use records::*;
pub use role::*;
