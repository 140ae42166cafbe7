//! # TapNex RBAC
//!
//! Role-Based Access Control for the TapNex dashboard.
//!
//! ## Components
//!
//! - `RoleResolver` - Email allow-lists to role, fixed priority order
//! - `dashboard_tabs` - Which dashboard sections each role sees
//! - `permissions` - What each role may do inside those sections
//! - `role_style` - Badge label and color per role

pub mod dashboard_tabs;
pub mod permissions;
pub mod role_resolver;
pub mod role_style;

pub use dashboard_tabs::{available_tabs, is_tab_visible, DashboardTab, TabId};
pub use permissions::{has_permission, permissions, visible_bookings, Permission};
pub use role_resolver::RoleResolver;
pub use role_style::{role_badge, BadgeColor, RoleBadge};
