//! Ports - what the application needs from the auth/database service

use async_trait::async_trait;
use shared::{AuthError, Identity, Profile, ProfileUpdate, Session, StoreError, UserId, UserMetadata};
use tokio::sync::broadcast;

/// Why the auth service emitted a session notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// Session-change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    /// The session after the change; `None` once signed out
    pub session: Option<Session>,
}

impl AuthEvent {
    pub fn new(kind: AuthEventKind, session: Option<Session>) -> Self {
        Self { kind, session }
    }
}

/// Hosted authentication service
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Current session, if any
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Session-change notifications, in emission order. Dropping the
    /// receiver ends the subscription.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<Identity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// The `profiles` table
#[async_trait]
pub trait ProfileTable: Send + Sync {
    async fn select(&self, id: &UserId) -> Result<Option<Profile>, StoreError>;

    /// Insert a new row; fails with `Duplicate` if the id exists
    async fn insert(&self, profile: &Profile) -> Result<Profile, StoreError>;

    /// Update an existing row; fails with `NotFound` if the id is absent
    async fn update(&self, id: &UserId, update: &ProfileUpdate) -> Result<Profile, StoreError>;
}
