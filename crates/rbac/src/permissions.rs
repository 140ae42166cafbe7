//! Role permission matrix
//!
//! What each role may do inside the dashboard sections it can see.

use serde::Serialize;
use shared::{Booking, Profile, Role};

/// A single capability inside the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CreateEvents,
    EditEvents,
    DeleteEvents,
    ViewEventDetails,
    ManageAllBookings,
    ManageEventBookings,
    CheckInBookings,
    ManageUsers,
    ViewUsers,
    FinancialReports,
    BasicReports,
    SystemSettings,
    ManageQrCodes,
    ScanQrCodes,
    ManageEntry,
    ViewAttendees,
    ExportData,
    ExportEventData,
    ViewAnalytics,
    BookTickets,
    ViewOwnBookings,
    DownloadQrCodes,
    UpdateProfile,
}

impl Permission {
    /// Human-readable description, as shown in the role editor
    pub fn description(&self) -> &'static str {
        match self {
            Permission::CreateEvents => "Create events",
            Permission::EditEvents => "Edit events",
            Permission::DeleteEvents => "Delete events",
            Permission::ViewEventDetails => "View event details",
            Permission::ManageAllBookings => "Manage all bookings",
            Permission::ManageEventBookings => "Manage event bookings",
            Permission::CheckInBookings => "Check in bookings",
            Permission::ManageUsers => "User management",
            Permission::ViewUsers => "View user data",
            Permission::FinancialReports => "Financial reports",
            Permission::BasicReports => "Basic reports",
            Permission::SystemSettings => "System settings",
            Permission::ManageQrCodes => "QR code management",
            Permission::ScanQrCodes => "QR code scanning",
            Permission::ManageEntry => "Entry management",
            Permission::ViewAttendees => "Basic attendee info",
            Permission::ExportData => "Export data",
            Permission::ExportEventData => "Export event data",
            Permission::ViewAnalytics => "Analytics access",
            Permission::BookTickets => "Book tickets",
            Permission::ViewOwnBookings => "View my bookings",
            Permission::DownloadQrCodes => "Download QR codes",
            Permission::UpdateProfile => "Update profile",
        }
    }
}

const ADMIN: &[Permission] = &[
    Permission::CreateEvents,
    Permission::EditEvents,
    Permission::DeleteEvents,
    Permission::ViewEventDetails,
    Permission::ManageAllBookings,
    Permission::CheckInBookings,
    Permission::ManageUsers,
    Permission::ViewUsers,
    Permission::FinancialReports,
    Permission::BasicReports,
    Permission::SystemSettings,
    Permission::ManageQrCodes,
    Permission::ScanQrCodes,
    Permission::ExportData,
    Permission::ViewAnalytics,
    Permission::UpdateProfile,
];

const SUB_ADMIN: &[Permission] = &[
    Permission::CreateEvents,
    Permission::EditEvents,
    Permission::ViewEventDetails,
    Permission::ManageEventBookings,
    Permission::ViewUsers,
    Permission::BasicReports,
    Permission::ManageQrCodes,
    Permission::ScanQrCodes,
    Permission::ExportEventData,
    Permission::ViewAnalytics,
    Permission::UpdateProfile,
];

const VOLUNTEER: &[Permission] = &[
    Permission::ScanQrCodes,
    Permission::ManageEntry,
    Permission::ViewEventDetails,
    Permission::ViewAttendees,
    Permission::UpdateProfile,
];

const CUSTOMER: &[Permission] = &[
    Permission::BookTickets,
    Permission::ViewOwnBookings,
    Permission::DownloadQrCodes,
    Permission::ViewEventDetails,
    Permission::UpdateProfile,
];

/// All permissions granted to a role
pub fn permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN,
        Role::SubAdmin => SUB_ADMIN,
        Role::Volunteer => VOLUNTEER,
        Role::Customer => CUSTOMER,
    }
}

/// Check a single permission
pub fn has_permission(role: Role, permission: Permission) -> bool {
    permissions(role).contains(&permission)
}

/// Bookings a profile may see: staff see all, customers only their own
pub fn visible_bookings<'a>(profile: &Profile, bookings: &'a [Booking]) -> Vec<&'a Booking> {
    if profile.role.is_staff() {
        bookings.iter().collect()
    } else {
        bookings.iter().filter(|b| b.belongs_to(&profile.id)).collect()
    }
}
