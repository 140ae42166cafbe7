//! Dashboard tab visibility by role

use serde::Serialize;
use shared::Role;

/// Identifier of a dashboard section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabId {
    Overview,
    Events,
    Bookings,
    QrScanning,
    Analytics,
    Users,
}

impl TabId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TabId::Overview => "overview",
            TabId::Events => "events",
            TabId::Bookings => "bookings",
            TabId::QrScanning => "qr-scanning",
            TabId::Analytics => "analytics",
            TabId::Users => "users",
        }
    }
}

impl core::fmt::Display for TabId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tab the dashboard mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardTab {
    pub id: TabId,
    pub label: &'static str,
}

const fn tab(id: TabId, label: &'static str) -> DashboardTab {
    DashboardTab { id, label }
}

const OVERVIEW: DashboardTab = tab(TabId::Overview, "Overview");
const EVENTS: DashboardTab = tab(TabId::Events, "Events");
const BOOKINGS: DashboardTab = tab(TabId::Bookings, "Bookings");
const MY_BOOKINGS: DashboardTab = tab(TabId::Bookings, "My Bookings");
const QR_SCANNING: DashboardTab = tab(TabId::QrScanning, "QR Code");
const ANALYTICS: DashboardTab = tab(TabId::Analytics, "Analytics");
const USERS: DashboardTab = tab(TabId::Users, "Users");

const ADMIN_TABS: [DashboardTab; 6] = [OVERVIEW, EVENTS, BOOKINGS, QR_SCANNING, ANALYTICS, USERS];
const SUB_ADMIN_TABS: [DashboardTab; 5] = [OVERVIEW, EVENTS, BOOKINGS, QR_SCANNING, ANALYTICS];
const VOLUNTEER_TABS: [DashboardTab; 4] = [OVERVIEW, EVENTS, BOOKINGS, QR_SCANNING];
const CUSTOMER_TABS: [DashboardTab; 4] = [OVERVIEW, EVENTS, MY_BOOKINGS, QR_SCANNING];

/// Tabs visible to a role, in display order. Overview is always first.
pub fn available_tabs(role: Role) -> &'static [DashboardTab] {
    match role {
        Role::Admin => &ADMIN_TABS,
        Role::SubAdmin => &SUB_ADMIN_TABS,
        Role::Volunteer => &VOLUNTEER_TABS,
        Role::Customer => &CUSTOMER_TABS,
    }
}

/// Check if a role gets a given tab
pub fn is_tab_visible(role: Role, id: TabId) -> bool {
    available_tabs(role).iter().any(|t| t.id == id)
}
