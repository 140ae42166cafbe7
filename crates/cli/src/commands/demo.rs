//! tapnex demo command
//!
//! Signs each demo account in and out against the in-memory backend and
//! shows what the dashboard would do for it.

use std::sync::Arc;

use audit::ActivityAction;
use backend::{InMemoryAuth, InMemoryProfileTable};
use clap::Args;
use console::style;
use rbac::available_tabs;
use session::{AccessGuard, GuardDecision, GuardPolicy, SessionProvider};
use shared::{normalize_email, AppConfig, Role, StoreError, UserMetadata};

use crate::display::{badge, describe_decision, wait_with_spinner, PrintNavigator};

/// Password of every demo account
pub const DEMO_PASSWORD: &str = "tapnex-demo";

/// Account that is on no allow-list
pub const DEMO_CUSTOMER: &str = "fan@tapnex.example";

#[derive(Debug, Args)]
pub struct DemoCommand {
    /// Make profile writes fail to show the local fallback
    #[arg(long)]
    pub fail_writes: bool,
}

/// One account per role: the first configured email of each list, then a customer
pub fn demo_accounts(config: &AppConfig) -> Vec<(String, Role)> {
    let lists = [
        (&config.roles.admin, Role::Admin),
        (&config.roles.sub_admin, Role::SubAdmin),
        (&config.roles.volunteer, Role::Volunteer),
    ];

    lists
        .into_iter()
        .filter_map(|(list, role)| list.first().map(|email| (email.clone(), role)))
        .chain(std::iter::once((DEMO_CUSTOMER.to_string(), Role::Customer)))
        .collect()
}

/// In-memory auth service with every demo account registered
pub fn demo_backend(config: &AppConfig) -> InMemoryAuth {
    demo_accounts(config)
        .into_iter()
        .fold(InMemoryAuth::new(), |auth, (email, role)| {
            let metadata = UserMetadata {
                full_name: Some(format!("Demo {}", role.display_name())),
                ..UserMetadata::default()
            };
            auth.with_user(&email, DEMO_PASSWORD, metadata)
        })
}

impl DemoCommand {
    pub async fn run(&self, config: &AppConfig) -> anyhow::Result<()> {
        let table = InMemoryProfileTable::new();
        if self.fail_writes {
            table.fail_writes(Some(StoreError::TableMissing("profiles".to_string())));
        }

        let provider = SessionProvider::from_config(
            Arc::new(demo_backend(config)),
            Arc::new(table.clone()),
            config,
        );
        let _mount = provider.mount();
        let mut states = provider.subscribe();
        wait_with_spinner(&mut states, "Checking session", |s| !s.loading).await?;

        let user_admin = AccessGuard::new(
            GuardPolicy::from_targets(&config.navigation).allow([Role::Admin]),
        );

        for (email, _) in demo_accounts(config) {
            println!();
            provider.sign_in(&email, DEMO_PASSWORD).await?;

            let wanted = normalize_email(&email);
            let snapshot = wait_with_spinner(&mut states, "Loading profile", |s| {
                s.profile().is_some_and(|p| normalize_email(&p.email) == wanted)
            })
            .await?;

            if let Some(record) = &snapshot.profile {
                let profile = record.profile();
                let saved = if record.is_persisted() {
                    style("saved").green()
                } else {
                    style("local copy only").yellow()
                };
                println!("{} {} ({})", profile.display_name(), badge(profile.role), saved);

                let tabs: Vec<_> = available_tabs(profile.role).iter().map(|t| t.label).collect();
                println!("  Tabs: {}", tabs.join(" | "));
            }

            let decision = user_admin.enforce(&snapshot, &PrintNavigator);
            println!("  User management page: {}", describe_decision(&decision));
            if matches!(decision, GuardDecision::Redirect(_)) {
                provider.record_activity(ActivityAction::AccessDenied, "Blocked from user management");
            }

            if self.fail_writes {
                table.fail_writes(None);
                let synced = provider.retry_profile_sync().await?;
                println!("  Retried save: persisted = {}", synced.is_persisted());
                table.fail_writes(Some(StoreError::TableMissing("profiles".to_string())));
            }

            provider.sign_out().await?;
        }

        let stats = provider.activity_stats();
        println!();
        println!(
            "Activity: {} entries, {} failures",
            stats.total_entries, stats.failure_count
        );
        for entry in provider.recent_activity(5) {
            println!("  {} {}", style(&entry.action).dim(), entry.description);
        }
        Ok(())
    }
}
