//! # TapNex Session
//!
//! Session state for the dashboard: who is signed in, which profile they
//! have, and whether a page may render for them.
//!
//! The [`SessionProvider`] is created explicitly and handed to whoever needs
//! it; there is no global instance.

mod guard;
mod profile_store;
mod provider;
mod state;

pub use guard::{AccessGuard, GuardDecision, GuardPolicy, Navigator};
pub use profile_store::ProfileStore;
pub use provider::{MountHandle, SessionProvider};
pub use state::AuthSnapshot;
