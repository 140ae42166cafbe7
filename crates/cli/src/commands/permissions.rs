//! tapnex permissions command

use clap::Args;
use console::style;
use rbac::{permissions, Permission};
use shared::Role;

use crate::display::badge;

#[derive(Debug, Args)]
pub struct PermissionsCommand {
    /// Role to describe
    pub role: Role,
}

impl PermissionsCommand {
    pub fn run(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&self.report())?);
            return Ok(());
        }

        println!("{} {}", badge(self.role), self.role.description());
        for permission in self.granted() {
            println!("  {} {}", style("✓").green(), permission.description());
        }
        Ok(())
    }

    pub fn granted(&self) -> &'static [Permission] {
        permissions(self.role)
    }

    pub fn report(&self) -> serde_json::Value {
        let granted: Vec<_> = self
            .granted()
            .iter()
            .map(|p| serde_json::json!({ "id": p, "description": p.description() }))
            .collect();

        serde_json::json!({
            "role": self.role,
            "permissions": granted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volunteer_report() {
        let report = PermissionsCommand { role: Role::Volunteer }.report();
        let ids: Vec<_> = report["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();

        assert!(ids.contains(&"scan_qr_codes".to_string()));
        assert!(!ids.contains(&"manage_users".to_string()));
    }

    #[test]
    fn test_admin_has_more_than_customer() {
        let admin = PermissionsCommand { role: Role::Admin }.granted().len();
        let customer = PermissionsCommand { role: Role::Customer }.granted().len();
        assert!(admin > customer);
    }
}
