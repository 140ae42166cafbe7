//! # TapNex Backend
//!
//! The boundary to the hosted auth/database service.
//!
//! ```text
//! Session crate          │  This crate
//! ───────────────────────┼──────────────────────────────
//! SessionProvider        │  trait AuthBackend   (port)
//! ProfileStore           │  trait ProfileTable  (port)
//!                        │  InMemoryAuth        (adapter)
//!                        │  InMemoryProfileTable(adapter)
//! ```
//!
//! The ports describe only the calls the application makes; the hosted
//! service's protocol is not modelled here.

pub mod in_memory;
pub mod ports;

pub use in_memory::{InMemoryAuth, InMemoryProfileTable};
pub use ports::{AuthBackend, AuthEvent, AuthEventKind, ProfileTable};
