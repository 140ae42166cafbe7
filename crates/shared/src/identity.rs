//! Identity - the principal issued by the external auth service
//!
//! The application never mutates an identity; it only reads the id, email
//! and the metadata supplied at sign-up.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::role::Role;

/// Opaque identifier of an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form metadata attached to an identity at sign-up
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Role computed client-side from the email before sign-up
    #[serde(default)]
    pub role: Option<Role>,
}

/// Authenticated principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub metadata: UserMetadata,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            metadata: UserMetadata::default(),
        }
    }

    /// Builder: set metadata
    pub fn with_metadata(mut self, metadata: UserMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A live session as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub identity: Identity,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            issued_at: Utc::now(),
        }
    }
}

/// Canonical form used for every email comparison: trimmed, ASCII-lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Loose structural check (`local@domain.tld`), the same bar the sign-up form sets
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .map(|re| re.is_match(email.trim()))
        .unwrap_or(false)
}
