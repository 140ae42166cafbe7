//! Interactive REPL mode
//!
//! Runs a session provider against the in-memory backend seeded with the
//! demo accounts, so the sign-in flow can be tried by hand.

use std::io::{self, Write};
use std::sync::Arc;

use backend::InMemoryProfileTable;
use console::style;
use dialoguer::{Input, MultiSelect, Password};
use rbac::{available_tabs, permissions};
use session::{AccessGuard, AuthSnapshot, GuardPolicy, MountHandle, SessionProvider};
use shared::{normalize_email, AppConfig, NavigationTargets, ProfileUpdate, Role};
use tokio::sync::watch;

use crate::commands::demo::{demo_accounts, demo_backend, DEMO_PASSWORD};
use crate::display::{badge, describe_decision, wait_with_spinner, PrintNavigator};

/// Interactive CLI for trying the session flow
pub struct InteractiveCli {
    provider: SessionProvider,
    states: watch::Receiver<AuthSnapshot>,
    navigation: NavigationTargets,
    accounts: Vec<(String, Role)>,
    _mount: MountHandle,
}

impl InteractiveCli {
    /// Must be called from within a tokio runtime
    pub fn new(config: &AppConfig) -> Self {
        let provider = SessionProvider::from_config(
            Arc::new(demo_backend(config)),
            Arc::new(InMemoryProfileTable::new()),
            config,
        );
        let states = provider.subscribe();
        let mount = provider.mount();

        Self {
            provider,
            states,
            navigation: config.navigation.clone(),
            accounts: demo_accounts(config),
            _mount: mount,
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("TapNex Interactive Mode");
        println!("Type /help for commands, /quit to exit");
        self.print_accounts();
        println!();

        wait_with_spinner(&mut self.states, "Checking session", |s| !s.loading).await?;

        loop {
            print!("[{}] > ", self.prompt_label());
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            if !input.starts_with('/') {
                println!("Commands start with '/'. Type /help for the list.");
                continue;
            }

            match self.handle_command(input).await {
                Ok(true) => break,
                Ok(false) => continue,
                Err(e) => println!("Error: {}", e),
            }
        }

        Ok(())
    }

    fn prompt_label(&self) -> String {
        let snapshot = self.provider.snapshot();
        match (snapshot.profile(), snapshot.identity.as_ref()) {
            (Some(profile), _) => format!("{} {}", profile.email, profile.role),
            (None, Some(identity)) => identity.email.clone(),
            (None, None) => "signed out".to_string(),
        }
    }

    fn print_accounts(&self) {
        println!("Demo accounts (password '{}'):", DEMO_PASSWORD);
        for (email, role) in &self.accounts {
            println!("  {} {}", email, badge(*role));
        }
    }

    pub async fn handle_command(&mut self, input: &str) -> anyhow::Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let args = &parts[parts.len().min(1)..];

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye!");
                return Ok(true);
            }
            "/help" | "/h" => {
                println!("Commands:");
                println!("  /signin [email] [password]        - Sign in");
                println!("  /signup [email] [password] [name] - Create an account");
                println!("  /signout                          - Sign out");
                println!("  /whoami                           - Show the current profile");
                println!("  /tabs                             - Dashboard tabs for your role");
                println!("  /permissions                      - What your role may do");
                println!("  /name <full name>                 - Update your name");
                println!("  /sync                             - Retry saving a local-only profile");
                println!("  /guard [role,role]                - Check a page restricted to roles");
                println!("  /activity [n]                     - Recent activity");
                println!("  /quit                             - Exit");
            }
            "/signin" => {
                let email = arg_or_prompt(args.first(), "Email")?;
                let password = match args.get(1) {
                    Some(p) => p.to_string(),
                    None => Password::new().with_prompt("Password").interact()?,
                };
                self.provider.sign_in(&email, &password).await?;
                self.wait_for_profile(&email).await?;
                self.print_whoami();
            }
            "/signup" => {
                let email = arg_or_prompt(args.first(), "Email")?;
                let password = match args.get(1) {
                    Some(p) => p.to_string(),
                    None => Password::new()
                        .with_prompt("Password")
                        .with_confirmation("Confirm password", "Passwords do not match")
                        .interact()?,
                };
                let full_name = if args.len() > 2 {
                    args[2..].join(" ")
                } else {
                    Input::<String>::new()
                        .with_prompt("Full name")
                        .allow_empty(true)
                        .interact_text()?
                };
                self.provider.sign_up(&email, &password, &full_name).await?;
                self.wait_for_profile(&email).await?;
                self.print_whoami();
            }
            "/signout" => {
                self.provider.sign_out().await?;
                println!("Signed out");
            }
            "/whoami" | "/status" => self.print_whoami(),
            "/tabs" => match self.provider.snapshot().role() {
                Some(role) => {
                    for tab in available_tabs(role) {
                        println!("  {} ({})", tab.label, tab.id);
                    }
                }
                None => println!("Sign in to see your dashboard"),
            },
            "/permissions" => match self.provider.snapshot().role() {
                Some(role) => {
                    for permission in permissions(role) {
                        println!("  {} {}", style("✓").green(), permission.description());
                    }
                }
                None => println!("Sign in to see your permissions"),
            },
            "/name" => {
                if args.is_empty() {
                    anyhow::bail!("usage: /name <full name>");
                }
                let profile = self
                    .provider
                    .update_profile(ProfileUpdate::new().with_full_name(args.join(" ")))
                    .await?;
                println!("Name set to {}", profile.display_name());
            }
            "/sync" => {
                let record = self.provider.retry_profile_sync().await?;
                if record.is_persisted() {
                    println!("Profile saved");
                } else {
                    println!("Profile still only stored locally");
                }
            }
            "/guard" => {
                let allowed = match args.first() {
                    Some(list) => parse_roles(list)?,
                    None => select_roles()?,
                };
                let policy = GuardPolicy::from_targets(&self.navigation).allow(allowed);
                let decision = AccessGuard::new(policy).enforce(&self.provider.snapshot(), &PrintNavigator);
                println!("Decision: {}", describe_decision(&decision));
            }
            "/activity" => {
                let limit = match args.first() {
                    Some(n) => n.parse()?,
                    None => 10,
                };
                let stats = self.provider.activity_stats();
                println!("{} entries, {} failures", stats.total_entries, stats.failure_count);
                for entry in self.provider.recent_activity(limit) {
                    println!(
                        "  {} {} {}",
                        style(entry.created_at.format("%H:%M:%S")).dim(),
                        entry.action,
                        entry.description
                    );
                }
            }
            _ => {
                println!("Unknown command: {}", cmd);
            }
        }

        Ok(false)
    }

    async fn wait_for_profile(&mut self, email: &str) -> anyhow::Result<AuthSnapshot> {
        let wanted = normalize_email(email);
        wait_with_spinner(&mut self.states, "Loading profile", |s| {
            s.profile().is_some_and(|p| normalize_email(&p.email) == wanted)
        })
        .await
    }

    fn print_whoami(&self) {
        let snapshot = self.provider.snapshot();
        match (&snapshot.profile, &snapshot.identity) {
            (Some(record), _) => {
                let profile = record.profile();
                println!("{} {}", profile.display_name(), badge(profile.role));
                println!("  {}", profile.email);
                println!("  {}", profile.role.description());
                if !record.is_persisted() {
                    println!("  {}", style("Profile not saved yet; try /sync").yellow());
                }
            }
            (None, Some(identity)) => println!("{} (profile loading)", identity.email),
            (None, None) => println!("Not signed in"),
        }
    }
}

fn arg_or_prompt(arg: Option<&&str>, prompt: &str) -> anyhow::Result<String> {
    match arg {
        Some(value) => Ok(value.to_string()),
        None => Ok(Input::<String>::new().with_prompt(prompt).interact_text()?),
    }
}

fn parse_roles(list: &str) -> anyhow::Result<Vec<Role>> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Role>().map_err(anyhow::Error::from))
        .collect()
}

fn select_roles() -> anyhow::Result<Vec<Role>> {
    let labels: Vec<_> = Role::all().iter().map(|r| r.display_name()).collect();
    let picked = MultiSelect::new()
        .with_prompt("Roles allowed on the page")
        .items(&labels)
        .interact()?;
    Ok(picked.into_iter().map(|i| Role::all()[i]).collect())
}
