//! ActivityLogger - Activity logging for TapNex

use serde::{Deserialize, Serialize};
use shared::{ActivityLog, UserId};
use std::collections::VecDeque;

/// Kinds of activity recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    SignIn,
    SignUp,
    SignOut,
    ProfileCreated,
    ProfileFallback,
    ProfileSynced,
    ProfileUpdated,
    AccessDenied,
}

impl ActivityAction {
    /// Value stored in `activity_logs.action`
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::SignIn => "sign_in",
            ActivityAction::SignUp => "sign_up",
            ActivityAction::SignOut => "sign_out",
            ActivityAction::ProfileCreated => "profile_created",
            ActivityAction::ProfileFallback => "profile_fallback",
            ActivityAction::ProfileSynced => "profile_synced",
            ActivityAction::ProfileUpdated => "profile_updated",
            ActivityAction::AccessDenied => "access_denied",
        }
    }

    pub fn all() -> &'static [ActivityAction] {
        &[
            ActivityAction::SignIn,
            ActivityAction::SignUp,
            ActivityAction::SignOut,
            ActivityAction::ProfileCreated,
            ActivityAction::ProfileFallback,
            ActivityAction::ProfileSynced,
            ActivityAction::ProfileUpdated,
            ActivityAction::AccessDenied,
        ]
    }

    /// Inverse of [`ActivityAction::as_str`]
    pub fn parse(action: &str) -> Option<ActivityAction> {
        Self::all().iter().copied().find(|a| a.as_str() == action)
    }

    /// Whether the entry records something that went wrong
    pub fn is_failure(&self) -> bool {
        matches!(self, ActivityAction::ProfileFallback | ActivityAction::AccessDenied)
    }
}

/// Bounded activity log; the oldest entry is evicted once full
#[derive(Debug)]
pub struct ActivityLogger {
    entries: VecDeque<ActivityLog>,
    max_entries: usize,
}

impl ActivityLogger {
    /// Create a new ActivityLogger
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
        }
    }

    /// Append an entry
    pub fn log(&mut self, entry: ActivityLog) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        tracing::debug!(user = %entry.user_id, action = %entry.action, "activity recorded");
        self.entries.push_back(entry);
    }

    /// Record an action for a user
    pub fn record(
        &mut self,
        user_id: &UserId,
        action: ActivityAction,
        description: impl Into<String>,
        metadata: Option<serde_json::Value>,
    ) {
        self.log(ActivityLog {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            action: action.as_str().to_string(),
            description: description.into(),
            metadata,
            created_at: chrono::Utc::now(),
        });
    }

    /// Get recent entries, newest first
    pub fn get_recent(&self, limit: usize) -> Vec<&ActivityLog> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Get recent entries for one user, newest first
    pub fn get_for_user(&self, user_id: &UserId, limit: usize) -> Vec<&ActivityLog> {
        self.entries
            .iter()
            .rev()
            .filter(|e| &e.user_id == user_id)
            .take(limit)
            .collect()
    }

    /// Get recent entries with a given action, newest first
    pub fn get_by_action(&self, action: ActivityAction, limit: usize) -> Vec<&ActivityLog> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.action == action.as_str())
            .take(limit)
            .collect()
    }

    /// Get statistics
    pub fn get_stats(&self) -> ActivityStats {
        ActivityStats {
            total_entries: self.entries.len(),
            failure_count: self
                .entries
                .iter()
                .filter(|e| ActivityAction::parse(&e.action).is_some_and(|a| a.is_failure()))
                .count(),
        }
    }

    /// Export as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries.iter().collect::<Vec<_>>()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Activity statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityStats {
    pub total_entries: usize,
    pub failure_count: usize,
}

impl Default for ActivityLogger {
    fn default() -> Self {
        Self::new(10_000)
    }
}
