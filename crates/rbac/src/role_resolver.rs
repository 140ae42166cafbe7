//! RoleResolver - Email allow-lists to role

use shared::{normalize_email, Role, RoleAllowLists};
use tracing::debug;

/// Maps an email address to a role using static allow-lists
///
/// Checks run admin, then sub-admin, then volunteer; the first list that
/// contains the email wins and anything else is a customer. An email listed
/// twice (a configuration mistake) therefore gets the higher role.
///
/// Emails are compared in normalized form (trimmed, ASCII-lowercased) on both
/// sides.
#[derive(Debug, Clone)]
pub struct RoleResolver {
    admin: Vec<String>,
    sub_admin: Vec<String>,
    volunteer: Vec<String>,
}

impl RoleResolver {
    /// Create a resolver from configured allow-lists
    pub fn new(lists: &RoleAllowLists) -> Self {
        let normalize = |list: &[String]| -> Vec<String> {
            list.iter().map(|e| normalize_email(e)).collect()
        };
        Self {
            admin: normalize(&lists.admin),
            sub_admin: normalize(&lists.sub_admin),
            volunteer: normalize(&lists.volunteer),
        }
    }

    /// Resolve the role for an email
    pub fn resolve(&self, email: &str) -> Role {
        let email = normalize_email(email);

        let role = if self.admin.contains(&email) {
            Role::Admin
        } else if self.sub_admin.contains(&email) {
            Role::SubAdmin
        } else if self.volunteer.contains(&email) {
            Role::Volunteer
        } else {
            Role::Customer
        };

        debug!(email = %email, role = %role, "resolved role from allow-lists");
        role
    }

    /// Emails configured for a role (customer has no list)
    pub fn listed(&self, role: Role) -> &[String] {
        match role {
            Role::Admin => &self.admin,
            Role::SubAdmin => &self.sub_admin,
            Role::Volunteer => &self.volunteer,
            Role::Customer => &[],
        }
    }
}

impl Default for RoleResolver {
    fn default() -> Self {
        Self::new(&RoleAllowLists::default())
    }
}
