//! # TapNex Audit
//!
//! Activity logging for TapNex: the in-memory side of the `activity_logs`
//! table.

mod activity_log;

pub use activity_log::{ActivityAction, ActivityLogger, ActivityStats};
