//! AuthSnapshot - what the rest of the app sees of the session

use shared::{Identity, Profile, ProfileRecord, Role};

/// Point-in-time view of the session
///
/// Published by the provider on every change. `loading` is true only until
/// the first session check finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub identity: Option<Identity>,
    pub profile: Option<ProfileRecord>,
    pub loading: bool,
}

impl AuthSnapshot {
    /// Initial state before the session has been checked
    pub fn loading() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: true,
        }
    }

    /// Settled, nobody signed in
    pub fn signed_out() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: false,
        }
    }

    /// Settled with a signed-in user and their profile
    pub fn signed_in(identity: Identity, profile: ProfileRecord) -> Self {
        Self {
            identity: Some(identity),
            profile: Some(profile),
            loading: false,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref().map(ProfileRecord::profile)
    }

    /// Role of the current profile, if one is loaded
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(ProfileRecord::role)
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self::loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserId;

    #[test]
    fn test_default_is_loading() {
        let snapshot = AuthSnapshot::default();
        assert!(snapshot.loading);
        assert!(!snapshot.is_signed_in());
        assert_eq!(snapshot.role(), None);
    }

    #[test]
    fn test_signed_in_exposes_role() {
        let identity = Identity::new(UserId::new("u-1"), "gate@example.com");
        let profile = Profile::for_identity(&identity, Role::Volunteer);

        let snapshot = AuthSnapshot::signed_in(identity, ProfileRecord::Transient(profile));

        assert!(!snapshot.loading);
        assert!(snapshot.is_signed_in());
        assert_eq!(snapshot.role(), Some(Role::Volunteer));
        assert_eq!(snapshot.profile().map(|p| p.email.as_str()), Some("gate@example.com"));
    }
}
