//! tapnex role command

use clap::Args;
use rbac::RoleResolver;
use shared::{AppConfig, Role};

use crate::display::badge;

#[derive(Debug, Args)]
pub struct RoleCommand {
    /// Email address to resolve
    pub email: String,
}

impl RoleCommand {
    pub fn run(&self, config: &AppConfig, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&self.report(config))?);
            return Ok(());
        }

        let role = self.resolve(config);
        println!("{} {}", self.email.trim(), badge(role));
        println!("  {}", role.description());
        Ok(())
    }

    /// Role a new profile for this email would get
    pub fn resolve(&self, config: &AppConfig) -> Role {
        RoleResolver::new(&config.roles).resolve(&self.email)
    }

    pub fn report(&self, config: &AppConfig) -> serde_json::Value {
        let role = self.resolve(config);
        serde_json::json!({
            "email": self.email.trim(),
            "role": role,
            "label": role.display_name(),
            "staff": role.is_staff(),
        })
    }
}
