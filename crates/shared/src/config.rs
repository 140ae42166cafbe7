//! Configuration types for TapNex

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Static email allow-lists that decide a new profile's role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAllowLists {
    #[serde(default)]
    pub admin: Vec<String>,

    #[serde(default)]
    pub sub_admin: Vec<String>,

    #[serde(default)]
    pub volunteer: Vec<String>,
}

impl Default for RoleAllowLists {
    fn default() -> Self {
        Self {
            admin: vec!["admin@tapnex.example".to_string()],
            sub_admin: vec!["organizer@tapnex.example".to_string()],
            volunteer: vec!["gate@tapnex.example".to_string()],
        }
    }
}

impl RoleAllowLists {
    /// Lists with no entries; everybody resolves to customer
    pub fn empty() -> Self {
        Self {
            admin: Vec::new(),
            sub_admin: Vec::new(),
            volunteer: Vec::new(),
        }
    }
}

/// Where the access guard sends people
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTargets {
    #[serde(default = "default_sign_in")]
    pub sign_in: String,

    #[serde(default = "default_unauthorized")]
    pub unauthorized: String,
}

fn default_sign_in() -> String {
    "/auth/login".to_string()
}

fn default_unauthorized() -> String {
    "/unauthorized".to_string()
}

impl Default for NavigationTargets {
    fn default() -> Self {
        Self {
            sign_in: default_sign_in(),
            unauthorized: default_unauthorized(),
        }
    }
}

/// Top-level configuration (`tapnex.yaml` / `tapnex.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub roles: RoleAllowLists,

    #[serde(default)]
    pub navigation: NavigationTargets,

    /// Maximum activity entries kept in memory
    #[serde(default = "default_activity_log_capacity")]
    pub activity_log_capacity: usize,
}

fn default_activity_log_capacity() -> usize {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roles: RoleAllowLists::default(),
            navigation: NavigationTargets::default(),
            activity_log_capacity: default_activity_log_capacity(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "json" => Ok(serde_json::from_str(&content)?),
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}
