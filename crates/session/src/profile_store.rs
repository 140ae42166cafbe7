//! ProfileStore - fetch-or-create over the `profiles` table
//!
//! Storage failures are never fatal here: when a profile cannot be read or
//! written, a locally synthesized one is returned instead, tagged
//! [`ProfileRecord::Transient`] so callers can tell.

use std::sync::Arc;

use backend::ProfileTable;
use rbac::RoleResolver;
use shared::{Identity, Profile, ProfileRecord, ProfileUpdate, Role, StoreError, UserId};
use tracing::{debug, warn};

/// How a profile was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProfileSource {
    Existing,
    Created,
    Fallback,
}

pub struct ProfileStore {
    table: Arc<dyn ProfileTable>,
    resolver: RoleResolver,
}

impl ProfileStore {
    pub fn new(table: Arc<dyn ProfileTable>, resolver: RoleResolver) -> Self {
        Self { table, resolver }
    }

    /// Role resolver used for new profiles
    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    /// Return the stored profile for `identity`, creating it if needed
    ///
    /// An existing row is returned as-is; its role is never recomputed. If
    /// the row exists but cannot be read, the local copy gets the customer
    /// role rather than a resolved one.
    pub async fn fetch_or_create(&self, identity: &Identity) -> ProfileRecord {
        self.load(identity).await.0
    }

    pub(crate) async fn load(&self, identity: &Identity) -> (ProfileRecord, ProfileSource) {
        match self.table.select(&identity.id).await {
            Ok(Some(existing)) => {
                debug!(user = %identity.id, role = %existing.role, "profile found");
                return (ProfileRecord::Persisted(existing), ProfileSource::Existing);
            }
            Ok(None) => debug!(user = %identity.id, "no profile yet, creating"),
            Err(err) => warn!(user = %identity.id, error = %err, "profile read failed, creating"),
        }

        let role = self.resolver.resolve(&identity.email);
        let synthesized = Profile::for_identity(identity, role);

        match self.table.insert(&synthesized).await {
            Ok(stored) => (ProfileRecord::Persisted(stored), ProfileSource::Created),
            Err(StoreError::Duplicate { .. }) => match self.table.select(&identity.id).await {
                Ok(Some(existing)) => {
                    debug!(user = %identity.id, role = %existing.role, "profile found on retry");
                    (ProfileRecord::Persisted(existing), ProfileSource::Existing)
                }
                _ => {
                    warn!(user = %identity.id, "profile exists but cannot be read, using customer copy");
                    let fallback = Profile::for_identity(identity, Role::Customer);
                    (ProfileRecord::Transient(fallback), ProfileSource::Fallback)
                }
            },
            Err(err) => {
                warn!(user = %identity.id, error = %err, "could not save profile, using local copy");
                (ProfileRecord::Transient(synthesized), ProfileSource::Fallback)
            }
        }
    }

    /// Apply `update` to the stored row
    pub async fn update(&self, id: &UserId, update: &ProfileUpdate) -> Result<Profile, StoreError> {
        self.table.update(id, update).await
    }

    /// Try again to persist a transient profile
    ///
    /// Persisted records come back untouched. If another writer created the
    /// row in the meantime, that row wins.
    pub async fn sync(&self, record: ProfileRecord) -> ProfileRecord {
        let profile = match record {
            ProfileRecord::Persisted(_) => return record,
            ProfileRecord::Transient(profile) => profile,
        };

        match self.table.insert(&profile).await {
            Ok(stored) => {
                debug!(user = %stored.id, "transient profile saved");
                ProfileRecord::Persisted(stored)
            }
            Err(StoreError::Duplicate { .. }) => match self.table.select(&profile.id).await {
                Ok(Some(existing)) => ProfileRecord::Persisted(existing),
                _ => ProfileRecord::Transient(profile),
            },
            Err(err) => {
                warn!(user = %profile.id, error = %err, "profile still not saved");
                ProfileRecord::Transient(profile)
            }
        }
    }
}

impl core::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
