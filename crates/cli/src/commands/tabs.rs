//! tapnex tabs command

use clap::Args;
use rbac::available_tabs;
use shared::Role;

use crate::display::badge;

#[derive(Debug, Args)]
pub struct TabsCommand {
    /// Role to list tabs for (admin, sub-admin, volunteer, customer)
    pub role: Role,
}

impl TabsCommand {
    pub fn run(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(&self.report())?);
            return Ok(());
        }

        println!("Dashboard tabs for {}", badge(self.role));
        for (i, tab) in available_tabs(self.role).iter().enumerate() {
            println!("  {}. {} ({})", i + 1, tab.label, tab.id);
        }
        Ok(())
    }

    pub fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "role": self.role,
            "tabs": available_tabs(self.role),
        })
    }
}
