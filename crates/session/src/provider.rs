//! SessionProvider - owns the auth state and keeps it in step with the backend
//!
//! The provider is the only writer of [`AuthSnapshot`]; everyone else
//! subscribes to it. Session notifications are handled one at a time by a
//! single listener task started with [`SessionProvider::mount`].
//!
//! Every identity change bumps a generation counter. A profile fetch only
//! publishes its result if the generation is still the one it started under,
//! so a slow fetch can never resurrect a profile after sign-out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use audit::{ActivityAction, ActivityLogger, ActivityStats};
use backend::{AuthBackend, AuthEvent, ProfileTable};
use rbac::RoleResolver;
use shared::{
    ActivityLog, AppConfig, AuthError, Identity, Profile, ProfileRecord, ProfileUpdate, Result,
    Session, UserId, UserMetadata,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::profile_store::{ProfileSource, ProfileStore};
use crate::state::AuthSnapshot;

struct Inner {
    backend: Arc<dyn AuthBackend>,
    store: ProfileStore,
    state: watch::Sender<AuthSnapshot>,
    generation: AtomicU64,
    activity: Mutex<ActivityLogger>,
}

/// Auth state holder, cheap to clone
#[derive(Clone)]
pub struct SessionProvider {
    inner: Arc<Inner>,
}

impl SessionProvider {
    pub fn new(backend: Arc<dyn AuthBackend>, store: ProfileStore) -> Self {
        Self::with_activity_log(backend, store, ActivityLogger::default())
    }

    /// Build a provider from application configuration
    pub fn from_config(
        backend: Arc<dyn AuthBackend>,
        table: Arc<dyn ProfileTable>,
        config: &AppConfig,
    ) -> Self {
        let store = ProfileStore::new(table, RoleResolver::new(&config.roles));
        Self::with_activity_log(backend, store, ActivityLogger::new(config.activity_log_capacity))
    }

    pub fn with_activity_log(
        backend: Arc<dyn AuthBackend>,
        store: ProfileStore,
        activity: ActivityLogger,
    ) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::loading());
        Self {
            inner: Arc::new(Inner {
                backend,
                store,
                state,
                generation: AtomicU64::new(0),
                activity: Mutex::new(activity),
            }),
        }
    }

    /// Receive every state change; drop the receiver to unsubscribe
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot::clone(&self.inner.state.borrow())
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity.clone()
    }

    pub fn current_profile(&self) -> Option<Profile> {
        self.inner.state.borrow().profile().cloned()
    }

    pub fn resolver(&self) -> &RoleResolver {
        self.inner.store.resolver()
    }

    /// Start following the backend session
    ///
    /// Subscribes to session changes, then loads the current session and its
    /// profile. `loading` turns false once that first check finishes, whether
    /// or not it succeeded. Must be called from within a tokio runtime.
    pub fn mount(&self) -> MountHandle {
        let events = self.inner.backend.subscribe();
        let provider = self.clone();
        debug!("mounting session provider");
        MountHandle {
            task: tokio::spawn(provider.listen(events)),
        }
    }

    async fn listen(self, mut events: broadcast::Receiver<AuthEvent>) {
        self.reload_session().await;

        loop {
            match events.recv().await {
                Ok(event) => {
                    debug!(kind = ?event.kind, "auth state changed");
                    self.apply_session(event.session).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "missed auth events, reloading session");
                    self.reload_session().await;
                }
                Err(RecvError::Closed) => {
                    debug!("auth event stream closed");
                    break;
                }
            }
        }
    }

    async fn reload_session(&self) {
        match self.inner.backend.get_session().await {
            Ok(session) => self.apply_session(session).await,
            Err(err) => {
                warn!(error = %err, "could not read current session");
                self.inner.state.send_modify(|s| s.loading = false);
            }
        }
    }

    fn bump_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == generation
    }

    async fn apply_session(&self, session: Option<Session>) {
        let generation = self.bump_generation();

        let Some(Session { identity, .. }) = session else {
            self.inner.state.send_modify(|s| *s = AuthSnapshot::signed_out());
            return;
        };

        let current = self.inner.state.send_if_modified(|s| {
            if !self.is_current(generation) {
                return false;
            }
            if s.identity.as_ref().map(|i| &i.id) != Some(&identity.id) {
                s.profile = None;
            }
            s.identity = Some(identity.clone());
            true
        });
        if !current {
            return;
        }

        let (record, source) = self.inner.store.load(&identity).await;
        let role = record.role();

        let applied = self.inner.state.send_if_modified(|s| {
            if !self.is_current(generation) {
                return false;
            }
            s.profile = Some(record);
            s.loading = false;
            true
        });
        if !applied {
            debug!(user = %identity.id, "session changed during profile fetch, discarding result");
            return;
        }

        match source {
            ProfileSource::Existing => {}
            ProfileSource::Created => self.record(
                &identity.id,
                ActivityAction::ProfileCreated,
                format!("Profile created with role {}", role.display_name()),
                None,
            ),
            ProfileSource::Fallback => self.record(
                &identity.id,
                ActivityAction::ProfileFallback,
                "Profile could not be saved, using a local copy",
                None,
            ),
        }
    }

    /// Sign in with email and password
    ///
    /// The profile follows through the session notification, not this call.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.inner.backend.sign_in_with_password(email, password).await?;
        self.record(&session.identity.id, ActivityAction::SignIn, "Signed in with password", None);
        Ok(session)
    }

    /// Register a new account
    ///
    /// The role the email resolves to is sent along as metadata.
    pub async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<Identity> {
        let role = self.resolver().resolve(email);
        let full_name = full_name.trim();
        let metadata = UserMetadata {
            full_name: (!full_name.is_empty()).then(|| full_name.to_string()),
            avatar_url: None,
            role: Some(role),
        };

        let identity = self.inner.backend.sign_up(email, password, metadata).await?;
        self.record(
            &identity.id,
            ActivityAction::SignUp,
            format!("Signed up as {}", role.display_name()),
            None,
        );
        Ok(identity)
    }

    /// Sign out and forget the local identity and profile
    ///
    /// Local state is cleared even when the backend call fails; the backend
    /// error is still returned.
    pub async fn sign_out(&self) -> Result<()> {
        let result = self.inner.backend.sign_out().await;
        if let Err(err) = &result {
            warn!(error = %err, "backend sign-out failed, clearing local session anyway");
        }

        self.bump_generation();
        let mut previous = None;
        self.inner.state.send_modify(|s| {
            previous = s.identity.take();
            *s = AuthSnapshot::signed_out();
        });

        if let Some(identity) = previous {
            info!(user = %identity.id, "session cleared");
            self.record(&identity.id, ActivityAction::SignOut, "Signed out", None);
        }
        result
    }

    /// Update the signed-in user's profile
    ///
    /// On success the change is merged into the local profile. On failure the
    /// local state is left as it was.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Profile> {
        let id = self.current_user_id().ok_or(AuthError::NotSignedIn)?;

        let stored = self.inner.store.update(&id, &update).await?;

        self.inner.state.send_if_modified(|s| match s.profile.as_mut() {
            Some(record) if record.profile().id == id => {
                let profile = record.profile_mut();
                profile.apply(&update);
                profile.updated_at = stored.updated_at;
                true
            }
            _ => false,
        });

        self.record(
            &id,
            ActivityAction::ProfileUpdated,
            "Profile updated",
            serde_json::to_value(&update).ok(),
        );
        Ok(stored)
    }

    /// Try again to persist a profile that only exists locally
    pub async fn retry_profile_sync(&self) -> Result<ProfileRecord> {
        let (identity, record) = {
            let state = self.inner.state.borrow();
            (state.identity.clone(), state.profile.clone())
        };
        let identity = identity.ok_or(AuthError::NotSignedIn)?;
        let generation = self.inner.generation.load(Ordering::SeqCst);

        let synced = match record {
            Some(record) if record.is_persisted() => return Ok(record),
            Some(record) => self.inner.store.sync(record).await,
            None => self.inner.store.fetch_or_create(&identity).await,
        };

        let applied = self.inner.state.send_if_modified(|s| {
            if !self.is_current(generation) {
                return false;
            }
            s.profile = Some(synced.clone());
            s.loading = false;
            true
        });

        if applied && synced.is_persisted() {
            self.record(&identity.id, ActivityAction::ProfileSynced, "Profile saved", None);
        }
        Ok(synced)
    }

    /// Record an activity entry for the signed-in user
    ///
    /// Returns false when nobody is signed in.
    pub fn record_activity(&self, action: ActivityAction, description: impl Into<String>) -> bool {
        match self.current_user_id() {
            Some(id) => {
                self.record(&id, action, description, None);
                true
            }
            None => false,
        }
    }

    /// Most recent activity entries, newest first
    pub fn recent_activity(&self, limit: usize) -> Vec<ActivityLog> {
        self.inner
            .activity
            .lock()
            .map(|log| log.get_recent(limit).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn activity_stats(&self) -> ActivityStats {
        self.inner
            .activity
            .lock()
            .map(|log| log.get_stats())
            .unwrap_or(ActivityStats {
                total_entries: 0,
                failure_count: 0,
            })
    }

    pub fn export_activity(&self) -> serde_json::Value {
        self.inner
            .activity
            .lock()
            .map(|log| log.export_json())
            .unwrap_or_default()
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.inner.state.borrow().identity.as_ref().map(|i| i.id.clone())
    }

    fn record(
        &self,
        user_id: &UserId,
        action: ActivityAction,
        description: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) {
        match self.inner.activity.lock() {
            Ok(mut log) => log.record(user_id, action, description, metadata),
            Err(_) => warn!(action = action.as_str(), "activity log unavailable"),
        }
    }
}

impl core::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionProvider")
            .field("state", &*self.inner.state.borrow())
            .field("generation", &self.inner.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Keeps the provider's listener alive; unmounting (or dropping) stops it
#[derive(Debug)]
pub struct MountHandle {
    task: JoinHandle<()>,
}

impl MountHandle {
    pub fn unmount(self) {
        debug!("unmounting session provider");
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use backend::{AuthEventKind, InMemoryAuth, InMemoryProfileTable};
    use shared::{Role, RoleAllowLists, StoreError};
    use std::time::Duration;

    const PASSWORD: &str = "secret-pw";

    fn lists() -> RoleAllowLists {
        RoleAllowLists {
            admin: vec!["boss@tapnex.test".to_string()],
            sub_admin: vec!["organizer@tapnex.test".to_string()],
            volunteer: vec!["gate@tapnex.test".to_string()],
        }
    }

    fn provider(auth: &InMemoryAuth, table: &InMemoryProfileTable) -> SessionProvider {
        let store = ProfileStore::new(Arc::new(table.clone()), RoleResolver::new(&lists()));
        SessionProvider::new(Arc::new(auth.clone()), store)
    }

    async fn wait_until(
        rx: &mut watch::Receiver<AuthSnapshot>,
        condition: impl FnMut(&AuthSnapshot) -> bool,
    ) -> AuthSnapshot {
        let snapshot = tokio::time::timeout(Duration::from_secs(2), rx.wait_for(condition))
            .await
            .expect("timed out waiting for auth state")
            .expect("provider dropped");
        AuthSnapshot::clone(&snapshot)
    }

    fn actions(provider: &SessionProvider) -> Vec<String> {
        provider.recent_activity(50).into_iter().map(|e| e.action).collect()
    }

    #[tokio::test]
    async fn test_mount_without_session_settles_signed_out() {
        let auth = InMemoryAuth::new();
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();
        assert!(rx.borrow().loading);

        let _handle = provider.mount();
        let snapshot = wait_until(&mut rx, |s| !s.loading).await;

        assert_eq!(snapshot, AuthSnapshot::signed_out());
    }

    #[tokio::test]
    async fn test_mount_restores_session_and_profile() {
        let auth = InMemoryAuth::new()
            .with_user("gate@tapnex.test", PASSWORD, UserMetadata::default())
            .with_session_for("gate@tapnex.test");
        let table = InMemoryProfileTable::new();
        let provider = provider(&auth, &table);
        let mut rx = provider.subscribe();

        let _handle = provider.mount();
        let snapshot = wait_until(&mut rx, |s| !s.loading).await;

        assert_eq!(snapshot.identity, auth.identity("gate@tapnex.test"));
        assert_eq!(snapshot.role(), Some(Role::Volunteer));
        assert!(snapshot.profile.unwrap().is_persisted());
        assert_eq!(table.count().unwrap(), 1);
        assert!(actions(&provider).contains(&"profile_created".to_string()));
    }

    #[tokio::test]
    async fn test_unavailable_backend_still_finishes_loading() {
        let auth = InMemoryAuth::new();
        auth.set_unavailable(true);
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();

        let _handle = provider.mount();
        let snapshot = wait_until(&mut rx, |s| !s.loading).await;

        assert!(!snapshot.is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_in_loads_profile_through_notification() {
        let auth = InMemoryAuth::new().with_user("boss@tapnex.test", PASSWORD, UserMetadata::default());
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        wait_until(&mut rx, |s| !s.loading).await;

        let session = provider.sign_in("Boss@TapNex.test", PASSWORD).await.unwrap();
        let snapshot = wait_until(&mut rx, |s| s.profile.is_some()).await;

        assert_eq!(snapshot.identity, Some(session.identity));
        assert_eq!(snapshot.role(), Some(Role::Admin));
        assert!(actions(&provider).contains(&"sign_in".to_string()));
    }

    #[tokio::test]
    async fn test_lagging_listener_reloads_current_session() {
        let auth = InMemoryAuth::with_event_capacity(1)
            .with_user("boss@tapnex.test", PASSWORD, UserMetadata::default())
            .with_user("gate@tapnex.test", PASSWORD, UserMetadata::default());
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        wait_until(&mut rx, |s| !s.loading).await;

        // Nothing here yields, so the listener falls behind
        auth.sign_in_with_password("boss@tapnex.test", PASSWORD).await.unwrap();
        auth.sign_out().await.unwrap();
        auth.sign_in_with_password("gate@tapnex.test", PASSWORD).await.unwrap();
        auth.emit(AuthEventKind::TokenRefreshed);

        let snapshot = wait_until(&mut rx, |s| s.role() == Some(Role::Volunteer)).await;

        let current = auth.get_session().await.unwrap().map(|s| s.identity);
        assert!(current.is_some());
        assert_eq!(snapshot.identity, current);
        assert_eq!(provider.identity(), auth.identity("gate@tapnex.test"));
    }

    #[tokio::test]
    async fn test_sign_in_failure_is_returned_not_applied() {
        let auth = InMemoryAuth::new().with_user("fan@example.com", PASSWORD, UserMetadata::default());
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        wait_until(&mut rx, |s| !s.loading).await;

        let err = provider.sign_in("fan@example.com", "wrong").await.unwrap_err();

        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(provider.snapshot(), AuthSnapshot::signed_out());
        assert!(provider.recent_activity(10).is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_sends_resolved_role_as_metadata() {
        let auth = InMemoryAuth::new();
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        wait_until(&mut rx, |s| !s.loading).await;

        provider
            .sign_up("organizer@tapnex.test", PASSWORD, " Priya Menon ")
            .await
            .unwrap();

        let identity = auth.identity("organizer@tapnex.test").unwrap();
        assert_eq!(identity.metadata.role, Some(Role::SubAdmin));
        assert_eq!(identity.metadata.full_name.as_deref(), Some("Priya Menon"));

        let snapshot = wait_until(&mut rx, |s| s.profile.is_some()).await;
        assert_eq!(snapshot.role(), Some(Role::SubAdmin));
        assert_eq!(
            snapshot.profile().and_then(|p| p.full_name.as_deref()),
            Some("Priya Menon")
        );
    }

    #[tokio::test]
    async fn test_sign_out_clears_profile() {
        let auth = InMemoryAuth::new()
            .with_user("fan@example.com", PASSWORD, UserMetadata::default())
            .with_session_for("fan@example.com");
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        wait_until(&mut rx, |s| s.profile.is_some()).await;

        provider.sign_out().await.unwrap();

        assert_eq!(provider.current_profile(), None);
        assert_eq!(provider.identity(), None);
        assert!(!provider.snapshot().loading);
        assert_eq!(actions(&provider)[0], "sign_out");
    }

    #[tokio::test]
    async fn test_existing_role_is_kept() {
        let auth = InMemoryAuth::new().with_user("boss@tapnex.test", PASSWORD, UserMetadata::default());
        let table = InMemoryProfileTable::new();
        let identity = auth.identity("boss@tapnex.test").unwrap();
        table
            .insert(&Profile::for_identity(&identity, Role::Customer))
            .await
            .unwrap();
        let provider = provider(&auth, &table);
        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        wait_until(&mut rx, |s| !s.loading).await;

        provider.sign_in("boss@tapnex.test", PASSWORD).await.unwrap();
        let snapshot = wait_until(&mut rx, |s| s.profile.is_some()).await;

        assert_eq!(snapshot.role(), Some(Role::Customer));
    }

    #[tokio::test]
    async fn test_update_profile_merges_on_success() {
        let auth = InMemoryAuth::new()
            .with_user("fan@example.com", PASSWORD, UserMetadata::default())
            .with_session_for("fan@example.com");
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        wait_until(&mut rx, |s| s.profile.is_some()).await;

        let stored = provider
            .update_profile(ProfileUpdate::new().with_full_name("Ravi K"))
            .await
            .unwrap();

        let local = provider.current_profile().unwrap();
        assert_eq!(local.full_name.as_deref(), Some("Ravi K"));
        assert_eq!(local, stored);
        assert_eq!(actions(&provider)[0], "profile_updated");
    }

    #[tokio::test]
    async fn test_update_profile_failure_leaves_state() {
        let auth = InMemoryAuth::new()
            .with_user("fan@example.com", PASSWORD, UserMetadata::default())
            .with_session_for("fan@example.com");
        let table = InMemoryProfileTable::new();
        let provider = provider(&auth, &table);
        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        let before = wait_until(&mut rx, |s| s.profile.is_some()).await;

        table.fail_writes(Some(StoreError::Unavailable("offline".to_string())));
        let err = provider
            .update_profile(ProfileUpdate::new().with_full_name("Nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Store(StoreError::Unavailable(_))));
        assert_eq!(provider.snapshot(), before);
    }

    #[tokio::test]
    async fn test_update_profile_requires_sign_in() {
        let provider = provider(&InMemoryAuth::new(), &InMemoryProfileTable::new());

        let err = provider.update_profile(ProfileUpdate::new()).await.unwrap_err();

        assert_eq!(err, AuthError::NotSignedIn);
    }

    #[tokio::test]
    async fn test_transient_profile_then_retry_sync() {
        let auth = InMemoryAuth::new()
            .with_user("gate@tapnex.test", PASSWORD, UserMetadata::default())
            .with_session_for("gate@tapnex.test");
        let table = InMemoryProfileTable::new();
        table.fail_writes(Some(StoreError::TableMissing("profiles".to_string())));
        let provider = provider(&auth, &table);
        let mut rx = provider.subscribe();
        let _handle = provider.mount();

        let snapshot = wait_until(&mut rx, |s| !s.loading).await;
        let record = snapshot.profile.unwrap();
        assert!(!record.is_persisted());
        assert_eq!(record.role(), Role::Volunteer);
        assert_eq!(provider.activity_stats().failure_count, 1);

        table.fail_writes(None);
        let synced = provider.retry_profile_sync().await.unwrap();

        assert!(synced.is_persisted());
        assert_eq!(provider.snapshot().profile, Some(synced));
        assert_eq!(table.count().unwrap(), 1);
        assert_eq!(actions(&provider)[0], "profile_synced");
    }

    #[tokio::test]
    async fn test_unmount_stops_following_backend() {
        let auth = InMemoryAuth::new().with_user("fan@example.com", PASSWORD, UserMetadata::default());
        let provider = provider(&auth, &InMemoryProfileTable::new());
        let mut rx = provider.subscribe();
        let handle = provider.mount();
        wait_until(&mut rx, |s| !s.loading).await;
        assert!(handle.is_active());

        handle.unmount();
        auth.sign_in_with_password("fan@example.com", PASSWORD).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!provider.snapshot().is_signed_in());
    }

    #[tokio::test]
    async fn test_record_activity_needs_a_user() {
        let auth = InMemoryAuth::new()
            .with_user("fan@example.com", PASSWORD, UserMetadata::default())
            .with_session_for("fan@example.com");
        let provider = provider(&auth, &InMemoryProfileTable::new());
        assert!(!provider.record_activity(ActivityAction::AccessDenied, "no user"));

        let mut rx = provider.subscribe();
        let _handle = provider.mount();
        wait_until(&mut rx, |s| s.is_signed_in()).await;

        assert!(provider.record_activity(ActivityAction::AccessDenied, "Tried /admin"));
        let json = provider.export_activity();
        assert!(json
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e["action"] == "access_denied"));
    }

    /// Auth backend that never announces sign-out, so only the provider's
    /// own bookkeeping can keep a late profile out of the state
    struct QuietAuth {
        session: Session,
        events: broadcast::Sender<AuthEvent>,
    }

    #[async_trait]
    impl AuthBackend for QuietAuth {
        async fn get_session(&self) -> Result<Option<Session>> {
            Ok(Some(self.session.clone()))
        }

        fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
            self.events.subscribe()
        }

        async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<Session> {
            Err(AuthError::InvalidCredentials)
        }

        async fn sign_up(&self, _email: &str, _password: &str, _metadata: UserMetadata) -> Result<Identity> {
            Err(AuthError::Unavailable("sign-up disabled".to_string()))
        }

        async fn sign_out(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_profile_fetch_finishing_after_sign_out_is_discarded() {
        let identity = Identity::new(UserId::new("u-slow"), "fan@example.com");
        let (events, _) = broadcast::channel(4);
        let auth = QuietAuth {
            session: Session::new(identity),
            events,
        };
        let table = InMemoryProfileTable::new();
        table.delay_selects(Some(Duration::from_millis(100)));
        let store = ProfileStore::new(Arc::new(table.clone()), RoleResolver::new(&lists()));
        let provider = SessionProvider::new(Arc::new(auth), store);

        let _handle = provider.mount();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(provider.snapshot().is_signed_in());
        assert!(provider.snapshot().loading);

        provider.sign_out().await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(provider.snapshot(), AuthSnapshot::signed_out());
        assert_eq!(provider.current_profile(), None);
    }
}
