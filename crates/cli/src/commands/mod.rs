//! CLI Commands

pub mod demo;
pub mod guard;
pub mod permissions;
pub mod role;
pub mod tabs;

pub use demo::DemoCommand;
pub use guard::GuardCommand;
pub use permissions::PermissionsCommand;
pub use role::RoleCommand;
pub use tabs::TabsCommand;

use std::path::Path;

use anyhow::Context;
use shared::AppConfig;

/// Load configuration from `path`, or the built-in defaults without one
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(AppConfig::default()),
    }
}
