//! Role - the closed set of user roles

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UnknownRoleError;

/// The four roles a TapNex profile can hold
///
/// Ordered from most to least privileged. Serialized with the exact strings
/// stored in the `profiles.role` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Full system access
    Admin,
    /// Event management without user administration
    SubAdmin,
    /// Entry staff: scans tickets at the door
    Volunteer,
    /// Anyone else who signs up
    #[default]
    Customer,
}

impl Role {
    /// Get the wire name of this role (`"sub-admin"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SubAdmin => "sub-admin",
            Role::Volunteer => "volunteer",
            Role::Customer => "customer",
        }
    }

    /// Get the display name shown on badges
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::SubAdmin => "Sub-admin",
            Role::Volunteer => "Volunteer",
            Role::Customer => "Customer",
        }
    }

    /// Get a description of what this role is for
    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Complete system overview and management controls",
            Role::SubAdmin => "Your events and management dashboard",
            Role::Volunteer => "Your volunteer activities and assigned tasks",
            Role::Customer => "Your bookings and event history",
        }
    }

    /// Get all roles, most privileged first
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::SubAdmin, Role::Volunteer, Role::Customer]
    }

    /// Check if this role is one of the staff roles (anything but customer)
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Customer)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "sub-admin" | "sub_admin" | "subadmin" => Ok(Role::SubAdmin),
            "volunteer" => Ok(Role::Volunteer),
            "customer" => Ok(Role::Customer),
            _ => Err(UnknownRoleError {
                value: s.to_string(),
                available_roles: Role::all().iter().map(|r| r.as_str().to_string()).collect(),
            }),
        }
    }
}
