//! Profile - the application-level record of a user
//!
//! One profile per identity id. The role is assigned once, when the profile
//! is first created, and only changes through an explicit [`ProfileUpdate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{Identity, UserId};
use crate::role::Role;

/// Row of the `profiles` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Synthesize a fresh profile for an identity with an already-resolved role
    pub fn for_identity(identity: &Identity, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            full_name: identity.metadata.full_name.clone(),
            role,
            avatar_url: identity.metadata.avatar_url.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Name to greet the user with: full name, falling back to email
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }

    /// Apply the fields present in `update`
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(full_name) = &update.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(avatar_url) = &update.avatar_url {
            self.avatar_url = avatar_url.clone();
        }
    }
}

/// Partial profile update
///
/// `None` leaves a field untouched. For nullable columns the inner option
/// distinguishes "set to null" (`Some(None)`) from "leave alone" (`None`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set full name
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(Some(full_name.into()));
        self
    }

    /// Builder: set role
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Builder: set or clear avatar
    pub fn with_avatar_url(mut self, avatar_url: Option<String>) -> Self {
        self.avatar_url = Some(avatar_url);
        self
    }

    /// Builder: set email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.full_name.is_none()
            && self.role.is_none()
            && self.avatar_url.is_none()
    }
}

/// A profile together with whether it actually reached storage
///
/// `Transient` profiles were synthesized in memory because the write failed;
/// they are fully usable for the session but still need a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileRecord {
    Persisted(Profile),
    Transient(Profile),
}

impl ProfileRecord {
    pub fn profile(&self) -> &Profile {
        match self {
            ProfileRecord::Persisted(p) | ProfileRecord::Transient(p) => p,
        }
    }

    pub fn profile_mut(&mut self) -> &mut Profile {
        match self {
            ProfileRecord::Persisted(p) | ProfileRecord::Transient(p) => p,
        }
    }

    pub fn into_profile(self) -> Profile {
        match self {
            ProfileRecord::Persisted(p) | ProfileRecord::Transient(p) => p,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, ProfileRecord::Persisted(_))
    }

    pub fn role(&self) -> Role {
        self.profile().role
    }
}
