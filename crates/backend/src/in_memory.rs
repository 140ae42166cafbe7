//! In-Memory Backend Implementations
//!
//! Simple in-memory implementations of the backend ports.
//! Used by the CLI demo and by tests; faults can be injected to exercise the
//! storage fallback paths.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    is_valid_email, normalize_email, AuthError, Identity, Profile, ProfileUpdate, Session,
    StoreError, UserId, UserMetadata,
};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::ports::{AuthBackend, AuthEvent, AuthEventKind, ProfileTable};

const PROFILES: &str = "profiles";
const EVENT_CAPACITY: usize = 64;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct UserRecord {
    identity: Identity,
    password: String,
}

#[derive(Debug, Default)]
struct AuthState {
    /// Keyed by normalized email
    users: HashMap<String, UserRecord>,
    current: Option<Session>,
    unavailable: bool,
}

/// In-memory auth service
///
/// Thread-safe implementation using RwLock. Session changes are broadcast
/// to every subscriber.
#[derive(Debug, Clone)]
pub struct InMemoryAuth {
    state: Arc<RwLock<AuthState>>,
    events: broadcast::Sender<AuthEvent>,
}

impl InMemoryAuth {
    pub fn new() -> Self {
        Self::with_event_capacity(EVENT_CAPACITY)
    }

    /// Keep at most `capacity` undelivered notifications per subscriber
    pub fn with_event_capacity(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            state: Arc::new(RwLock::new(AuthState::default())),
            events,
        }
    }

    /// Builder: register a user up front
    pub fn with_user(self, email: &str, password: &str, metadata: UserMetadata) -> Self {
        if let Ok(mut state) = self.state.write() {
            let identity = Identity::new(new_user_id(), email.trim()).with_metadata(metadata);
            state.users.insert(
                normalize_email(email),
                UserRecord {
                    identity,
                    password: password.to_string(),
                },
            );
        }
        self
    }

    /// Builder: start with an already signed-in user (a restored session)
    pub fn with_session_for(self, email: &str) -> Self {
        if let Ok(mut state) = self.state.write() {
            let session = state
                .users
                .get(&normalize_email(email))
                .map(|u| Session::new(u.identity.clone()));
            state.current = session;
        }
        self
    }

    /// Simulate the service being unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.state.write() {
            state.unavailable = unavailable;
        }
    }

    /// Look up a registered identity by email
    pub fn identity(&self, email: &str) -> Option<Identity> {
        self.state
            .read()
            .ok()?
            .users
            .get(&normalize_email(email))
            .map(|u| u.identity.clone())
    }

    /// Emit a notification by hand (token refresh and the like)
    pub fn emit(&self, kind: AuthEventKind) {
        let session = self.state.read().ok().and_then(|s| s.current.clone());
        self.broadcast(AuthEvent::new(kind, session));
    }

    fn broadcast(&self, event: AuthEvent) {
        debug!(kind = ?event.kind, signed_in = event.session.is_some(), "auth event");
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, AuthState>, AuthError> {
        let state = self
            .state
            .write()
            .map_err(|_| AuthError::Unavailable("Failed to acquire write lock".to_string()))?;
        if state.unavailable {
            return Err(AuthError::Unavailable("auth service unreachable".to_string()));
        }
        Ok(state)
    }
}

impl Default for InMemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

fn new_user_id() -> UserId {
    UserId::new(uuid::Uuid::new_v4().to_string())
}

#[async_trait]
impl AuthBackend for InMemoryAuth {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let state = self
            .state
            .read()
            .map_err(|_| AuthError::Unavailable("Failed to acquire read lock".to_string()))?;
        if state.unavailable {
            return Err(AuthError::Unavailable("auth service unreachable".to_string()));
        }
        Ok(state.current.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let session = {
            let mut state = self.write_state()?;
            let user = state
                .users
                .get(&normalize_email(email))
                .filter(|u| u.password == password)
                .ok_or(AuthError::InvalidCredentials)?;
            let session = Session::new(user.identity.clone());
            state.current = Some(session.clone());
            session
        };

        info!(user = %session.identity.id, "signed in");
        self.broadcast(AuthEvent::new(AuthEventKind::SignedIn, Some(session.clone())));
        Ok(session)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<Identity, AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail(email.to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword { min: MIN_PASSWORD_LEN });
        }

        let session = {
            let mut state = self.write_state()?;
            let key = normalize_email(email);
            if state.users.contains_key(&key) {
                return Err(AuthError::EmailTaken(email.trim().to_string()));
            }

            let identity = Identity::new(new_user_id(), email.trim()).with_metadata(metadata);
            state.users.insert(
                key,
                UserRecord {
                    identity: identity.clone(),
                    password: password.to_string(),
                },
            );
            let session = Session::new(identity);
            state.current = Some(session.clone());
            session
        };

        info!(user = %session.identity.id, "signed up");
        let identity = session.identity.clone();
        self.broadcast(AuthEvent::new(AuthEventKind::SignedIn, Some(session)));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.write_state()?.current.take();
        if let Some(session) = previous {
            info!(user = %session.identity.id, "signed out");
        }
        self.broadcast(AuthEvent::new(AuthEventKind::SignedOut, None));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Faults {
    read: Option<StoreError>,
    read_once: Option<StoreError>,
    write: Option<StoreError>,
    select_delay: Option<Duration>,
}

/// In-memory `profiles` table
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileTable {
    rows: Arc<RwLock<HashMap<UserId, Profile>>>,
    faults: Arc<RwLock<Faults>>,
}

impl InMemoryProfileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every select fail with `error` (or stop failing with `None`)
    pub fn fail_reads(&self, error: Option<StoreError>) {
        if let Ok(mut faults) = self.faults.write() {
            faults.read = error;
        }
    }

    /// Make only the next select fail with `error`
    pub fn fail_next_read(&self, error: StoreError) {
        if let Ok(mut faults) = self.faults.write() {
            faults.read_once = Some(error);
        }
    }

    /// Make every insert/update fail with `error` (or stop failing with `None`)
    pub fn fail_writes(&self, error: Option<StoreError>) {
        if let Ok(mut faults) = self.faults.write() {
            faults.write = error;
        }
    }

    /// Slow every select down by `delay`
    pub fn delay_selects(&self, delay: Option<Duration>) {
        if let Ok(mut faults) = self.faults.write() {
            faults.select_delay = delay;
        }
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read_rows()?.len())
    }

    fn read_rows(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<UserId, Profile>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Unavailable("Failed to acquire read lock".to_string()))
    }

    fn write_rows(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<UserId, Profile>>, StoreError> {
        if let Some(err) = self.faults.read().ok().and_then(|f| f.write.clone()) {
            return Err(err);
        }
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable("Failed to acquire write lock".to_string()))
    }
}

#[async_trait]
impl ProfileTable for InMemoryProfileTable {
    async fn select(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        let (fault, delay) = match self.faults.write() {
            Ok(mut f) => (f.read_once.take().or_else(|| f.read.clone()), f.select_delay),
            Err(_) => (None, None),
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = fault {
            return Err(err);
        }
        Ok(self.read_rows()?.get(id).cloned())
    }

    async fn insert(&self, profile: &Profile) -> Result<Profile, StoreError> {
        let mut rows = self.write_rows()?;
        if rows.contains_key(&profile.id) {
            return Err(StoreError::Duplicate {
                table: PROFILES.to_string(),
                id: profile.id.to_string(),
            });
        }
        rows.insert(profile.id.clone(), profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, id: &UserId, update: &ProfileUpdate) -> Result<Profile, StoreError> {
        let mut rows = self.write_rows()?;
        let row = rows.get_mut(id).ok_or_else(|| StoreError::NotFound {
            table: PROFILES.to_string(),
            id: id.to_string(),
        })?;
        row.apply(update);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}
