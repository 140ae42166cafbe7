//! Role badge styling

use serde::Serialize;
use shared::Role;

/// Badge palette used across the dashboard and header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Red,
    Orange,
    Blue,
    Gray,
}

impl BadgeColor {
    /// Utility classes for web rendering
    pub fn css_classes(&self) -> &'static str {
        match self {
            BadgeColor::Red => "bg-red-100 text-red-800",
            BadgeColor::Orange => "bg-orange-100 text-orange-800",
            BadgeColor::Blue => "bg-blue-100 text-blue-800",
            BadgeColor::Gray => "bg-gray-100 text-gray-800",
        }
    }
}

/// How a role is shown next to the user's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleBadge {
    pub role: Role,
    pub label: &'static str,
    pub color: BadgeColor,
}

/// Badge for a role. Every role has its own entry; there is no fallback style.
pub fn role_badge(role: Role) -> RoleBadge {
    let color = match role {
        Role::Admin => BadgeColor::Red,
        Role::SubAdmin => BadgeColor::Orange,
        Role::Volunteer => BadgeColor::Blue,
        Role::Customer => BadgeColor::Gray,
    };

    RoleBadge {
        role,
        label: role.display_name(),
        color,
    }
}
