//! Ticketing records read and written by the dashboard
//!
//! Field sets mirror the `events`, `bookings`, `qr_scans` and
//! `activity_logs` tables of the hosted database.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Active,
    Completed,
    Cancelled,
}

/// Row of the `events` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub total_tickets: u32,
    pub sold_tickets: u32,
    pub ticket_price: f64,
    pub status: EventStatus,
    pub image_url: Option<String>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    Cancelled,
    Refunded,
}

/// Row of the `bookings` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub event_id: String,
    pub customer_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub tickets: u32,
    pub amount: f64,
    pub status: BookingStatus,
    pub payment_method: String,
    pub transaction_id: String,
    pub qr_code: String,
    pub booking_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn belongs_to(&self, user: &UserId) -> bool {
        &self.customer_id == user
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStatus {
    Success,
    Failed,
    Duplicate,
}

/// Row of the `qr_scans` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrScan {
    pub id: String,
    pub booking_id: String,
    pub scanned_by: UserId,
    pub scan_time: DateTime<Utc>,
    pub status: ScanStatus,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row of the `activity_logs` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: String,
    pub user_id: UserId,
    pub action: String,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
