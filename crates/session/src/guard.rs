//! AccessGuard - decides whether a protected page may render

use shared::{NavigationTargets, Role};
use tokio::sync::watch;
use tracing::debug;

use crate::state::AuthSnapshot;

/// Something that can send the user elsewhere
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Who may see a page, and where everyone else goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    /// `None` admits any signed-in user
    pub allowed_roles: Option<Vec<Role>>,
    pub redirect_to: String,
    pub unauthorized_to: String,
    /// Keep waiting while a signed-in user's profile is still unresolved
    pub require_profile: bool,
}

impl GuardPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy using configured navigation targets
    pub fn from_targets(targets: &NavigationTargets) -> Self {
        Self {
            allowed_roles: None,
            redirect_to: targets.sign_in.clone(),
            unauthorized_to: targets.unauthorized.clone(),
            require_profile: false,
        }
    }

    /// Builder: restrict to these roles
    pub fn allow(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = Some(roles.into_iter().collect());
        self
    }

    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = target.into();
        self
    }

    pub fn unauthorized_to(mut self, target: impl Into<String>) -> Self {
        self.unauthorized_to = target.into();
        self
    }

    /// Builder: report `Loading` instead of `Render` until the profile arrives
    pub fn require_profile(mut self) -> Self {
        self.require_profile = true;
        self
    }

    fn admits(&self, role: Role) -> bool {
        self.allowed_roles
            .as_ref()
            .map_or(true, |roles| roles.contains(&role))
    }
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self::from_targets(&NavigationTargets::default())
    }
}

/// What a protected page should do right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not settled yet; show a loading indicator
    Loading,
    Redirect(String),
    Render,
}

#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    policy: GuardPolicy,
}

impl AccessGuard {
    pub fn new(policy: GuardPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Decide for a snapshot
    ///
    /// A signed-in user whose profile has not resolved yet is let through
    /// unless the policy requires the profile.
    pub fn evaluate(&self, snapshot: &AuthSnapshot) -> GuardDecision {
        if snapshot.loading {
            return GuardDecision::Loading;
        }
        if snapshot.identity.is_none() {
            return GuardDecision::Redirect(self.policy.redirect_to.clone());
        }

        match snapshot.role() {
            Some(role) if !self.policy.admits(role) => {
                GuardDecision::Redirect(self.policy.unauthorized_to.clone())
            }
            Some(_) => GuardDecision::Render,
            None if self.policy.require_profile => GuardDecision::Loading,
            None => GuardDecision::Render,
        }
    }

    /// Decide and, for redirects, navigate
    pub fn enforce(&self, snapshot: &AuthSnapshot, navigator: &dyn Navigator) -> GuardDecision {
        let decision = self.evaluate(snapshot);
        if let GuardDecision::Redirect(target) = &decision {
            debug!(target = %target, role = ?snapshot.role(), "guard redirect");
            navigator.navigate(target);
        }
        decision
    }

    /// Follow the session for as long as the provider publishes it
    ///
    /// Every change of decision is passed to `on_decision`, and each new
    /// redirect is navigated once. Returns the last decision once the
    /// sender is dropped.
    pub async fn watch(
        &self,
        mut states: watch::Receiver<AuthSnapshot>,
        navigator: &dyn Navigator,
        mut on_decision: impl FnMut(&GuardDecision),
    ) -> GuardDecision {
        let mut last: Option<GuardDecision> = None;
        loop {
            let snapshot = AuthSnapshot::clone(&states.borrow_and_update());
            let decision = self.evaluate(&snapshot);

            if last.as_ref() != Some(&decision) {
                if let GuardDecision::Redirect(target) = &decision {
                    debug!(target = %target, role = ?snapshot.role(), "guard redirect");
                    navigator.navigate(target);
                }
                on_decision(&decision);
                last = Some(decision);
            }

            if states.changed().await.is_err() {
                return last.unwrap_or(GuardDecision::Loading);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Identity, Profile, ProfileRecord, UserId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<String>>,
    }

    impl RecordingNavigator {
        fn visits(&self) -> Vec<String> {
            self.visits.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, target: &str) {
            self.visits.lock().unwrap().push(target.to_string());
        }
    }

    fn signed_in(role: Role) -> AuthSnapshot {
        let identity = Identity::new(UserId::new("u-1"), "someone@example.com");
        let profile = Profile::for_identity(&identity, role);
        AuthSnapshot::signed_in(identity, ProfileRecord::Persisted(profile))
    }

    fn profile_pending() -> AuthSnapshot {
        AuthSnapshot {
            identity: Some(Identity::new(UserId::new("u-1"), "someone@example.com")),
            profile: None,
            loading: false,
        }
    }

    fn admin_only() -> AccessGuard {
        AccessGuard::new(GuardPolicy::new().allow([Role::Admin]))
    }

    #[test]
    fn test_loading_never_redirects() {
        let navigator = RecordingNavigator::default();

        let decision = admin_only().enforce(&AuthSnapshot::loading(), &navigator);

        assert_eq!(decision, GuardDecision::Loading);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_signed_out_goes_to_sign_in() {
        let navigator = RecordingNavigator::default();

        let decision = admin_only().enforce(&AuthSnapshot::signed_out(), &navigator);

        assert_eq!(decision, GuardDecision::Redirect("/auth/login".to_string()));
        assert_eq!(navigator.visits(), vec!["/auth/login"]);
    }

    #[test]
    fn test_customer_is_unauthorized_for_admin_page() {
        let navigator = RecordingNavigator::default();

        let decision = admin_only().enforce(&signed_in(Role::Customer), &navigator);

        assert_eq!(decision, GuardDecision::Redirect("/unauthorized".to_string()));
        assert_eq!(navigator.visits(), vec!["/unauthorized"]);
    }

    #[test]
    fn test_admin_renders_admin_page() {
        let navigator = RecordingNavigator::default();

        assert_eq!(admin_only().enforce(&signed_in(Role::Admin), &navigator), GuardDecision::Render);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn test_no_allow_list_admits_every_role() {
        let guard = AccessGuard::default();
        for role in Role::all() {
            assert_eq!(guard.evaluate(&signed_in(*role)), GuardDecision::Render);
        }
    }

    #[test]
    fn test_pending_profile_renders_by_default() {
        assert_eq!(admin_only().evaluate(&profile_pending()), GuardDecision::Render);
    }

    #[test]
    fn test_require_profile_waits_for_it() {
        let guard = AccessGuard::new(GuardPolicy::new().allow([Role::Admin]).require_profile());

        assert_eq!(guard.evaluate(&profile_pending()), GuardDecision::Loading);
        assert_eq!(
            guard.evaluate(&signed_in(Role::Volunteer)),
            GuardDecision::Redirect("/unauthorized".to_string())
        );
    }

    #[test]
    fn test_custom_targets() {
        let targets = NavigationTargets {
            sign_in: "/login".to_string(),
            unauthorized: "/403".to_string(),
        };
        let guard = AccessGuard::new(GuardPolicy::from_targets(&targets).allow([Role::SubAdmin]));

        assert_eq!(
            guard.evaluate(&AuthSnapshot::signed_out()),
            GuardDecision::Redirect("/login".to_string())
        );
        assert_eq!(
            guard.evaluate(&signed_in(Role::Volunteer)),
            GuardDecision::Redirect("/403".to_string())
        );
    }

    #[tokio::test]
    async fn test_watch_waits_for_loading_to_finish() {
        let (tx, rx) = watch::channel(AuthSnapshot::loading());
        let navigator = RecordingNavigator::default();
        let guard = admin_only();

        let publisher = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            tx.send_replace(signed_in(Role::Customer));
        });

        let mut seen = Vec::new();
        let decision = guard.watch(rx, &navigator, |d| seen.push(d.clone())).await;

        publisher.await.unwrap();
        assert_eq!(decision, GuardDecision::Redirect("/unauthorized".to_string()));
        assert_eq!(
            seen,
            vec![GuardDecision::Loading, GuardDecision::Redirect("/unauthorized".to_string())]
        );
        assert_eq!(navigator.visits(), vec!["/unauthorized"]);
    }

    #[tokio::test]
    async fn test_watch_follows_profile_and_sign_out() {
        let (tx, rx) = watch::channel(profile_pending());
        let navigator = RecordingNavigator::default();
        let guard = admin_only();
        let (seen_tx, mut seen_rx) = tokio::sync::mpsc::unbounded_channel();

        let watcher = async {
            guard
                .watch(rx, &navigator, |d| {
                    let _ = seen_tx.send(d.clone());
                })
                .await
        };
        let publisher = async {
            assert_eq!(seen_rx.recv().await, Some(GuardDecision::Render));
            tx.send_replace(signed_in(Role::Customer));
            assert_eq!(
                seen_rx.recv().await,
                Some(GuardDecision::Redirect("/unauthorized".to_string()))
            );
            tx.send_replace(AuthSnapshot::signed_out());
            assert_eq!(
                seen_rx.recv().await,
                Some(GuardDecision::Redirect("/auth/login".to_string()))
            );
            drop(tx);
        };

        let (last, ()) = tokio::join!(watcher, publisher);

        assert_eq!(last, GuardDecision::Redirect("/auth/login".to_string()));
        assert_eq!(navigator.visits(), vec!["/unauthorized", "/auth/login"]);
    }

    #[tokio::test]
    async fn test_watch_navigates_once_per_redirect() {
        let (tx, rx) = watch::channel(AuthSnapshot::signed_out());
        let navigator = RecordingNavigator::default();
        let guard = admin_only();

        let publisher = async {
            for _ in 0..3 {
                tokio::task::yield_now().await;
                tx.send_replace(AuthSnapshot::signed_out());
            }
            drop(tx);
        };

        let (last, ()) = tokio::join!(guard.watch(rx, &navigator, |_| {}), publisher);

        assert_eq!(last, GuardDecision::Redirect("/auth/login".to_string()));
        assert_eq!(navigator.visits(), vec!["/auth/login"]);
    }

    #[tokio::test]
    async fn test_watch_gives_up_when_provider_is_gone() {
        let (tx, rx) = watch::channel(AuthSnapshot::loading());
        drop(tx);
        let navigator = RecordingNavigator::default();

        assert_eq!(admin_only().watch(rx, &navigator, |_| {}).await, GuardDecision::Loading);
        assert!(navigator.visits().is_empty());
    }
}
