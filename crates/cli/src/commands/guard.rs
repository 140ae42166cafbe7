//! tapnex guard command

use clap::{Args, ValueEnum};
use session::{AccessGuard, AuthSnapshot, GuardDecision, GuardPolicy};
use shared::{AppConfig, Identity, Profile, ProfileRecord, Role, UserId};

use crate::display::{badge, describe_decision, PrintNavigator};

/// Session state to evaluate the guard against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SimulatedState {
    Loading,
    SignedOut,
    SignedIn,
}

#[derive(Debug, Args)]
pub struct GuardCommand {
    /// Session state to simulate
    #[arg(long, value_enum, default_value_t = SimulatedState::SignedIn)]
    pub state: SimulatedState,

    /// Role of the signed-in user; omit to simulate a profile that has not loaded
    #[arg(short, long)]
    pub role: Option<Role>,

    /// Roles allowed on the page, comma-separated; omit to admit any signed-in user
    #[arg(short, long, value_delimiter = ',')]
    pub allow: Vec<Role>,

    /// Wait for the profile instead of rendering without it
    #[arg(long)]
    pub require_profile: bool,
}

impl GuardCommand {
    pub fn run(&self, config: &AppConfig, json: bool) -> anyhow::Result<()> {
        let guard = AccessGuard::new(self.policy(config));
        let snapshot = self.snapshot();

        if json {
            let decision = guard.evaluate(&snapshot);
            println!("{}", serde_json::to_string_pretty(&report(&decision))?);
            return Ok(());
        }

        match snapshot.role() {
            Some(role) => println!("Signed in as {}", badge(role)),
            None if snapshot.is_signed_in() => println!("Signed in, profile not loaded yet"),
            None if snapshot.loading => println!("Session still loading"),
            None => println!("Signed out"),
        }
        let decision = guard.enforce(&snapshot, &PrintNavigator);
        println!("Decision: {}", describe_decision(&decision));
        Ok(())
    }

    pub fn policy(&self, config: &AppConfig) -> GuardPolicy {
        let mut policy = GuardPolicy::from_targets(&config.navigation);
        if !self.allow.is_empty() {
            policy = policy.allow(self.allow.iter().copied());
        }
        if self.require_profile {
            policy = policy.require_profile();
        }
        policy
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        match self.state {
            SimulatedState::Loading => AuthSnapshot::loading(),
            SimulatedState::SignedOut => AuthSnapshot::signed_out(),
            SimulatedState::SignedIn => {
                let identity = Identity::new(UserId::new("simulated"), "someone@example.com");
                AuthSnapshot {
                    profile: self
                        .role
                        .map(|role| ProfileRecord::Transient(Profile::for_identity(&identity, role))),
                    identity: Some(identity),
                    loading: false,
                }
            }
        }
    }
}

fn report(decision: &GuardDecision) -> serde_json::Value {
    match decision {
        GuardDecision::Loading => serde_json::json!({ "decision": "loading" }),
        GuardDecision::Redirect(target) => {
            serde_json::json!({ "decision": "redirect", "target": target })
        }
        GuardDecision::Render => serde_json::json!({ "decision": "render" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(state: SimulatedState, role: Option<Role>, allow: &[Role]) -> GuardCommand {
        GuardCommand {
            state,
            role,
            allow: allow.to_vec(),
            require_profile: false,
        }
    }

    fn decide(cmd: &GuardCommand) -> GuardDecision {
        AccessGuard::new(cmd.policy(&AppConfig::default())).evaluate(&cmd.snapshot())
    }

    #[test]
    fn test_customer_on_admin_page() {
        let cmd = command(SimulatedState::SignedIn, Some(Role::Customer), &[Role::Admin]);
        assert_eq!(decide(&cmd), GuardDecision::Redirect("/unauthorized".to_string()));
    }

    #[test]
    fn test_signed_out_and_loading() {
        let signed_out = command(SimulatedState::SignedOut, None, &[Role::Admin]);
        assert_eq!(decide(&signed_out), GuardDecision::Redirect("/auth/login".to_string()));

        let loading = command(SimulatedState::Loading, Some(Role::Admin), &[Role::Admin]);
        assert_eq!(decide(&loading), GuardDecision::Loading);
    }

    #[test]
    fn test_missing_profile_depends_on_policy() {
        let mut cmd = command(SimulatedState::SignedIn, None, &[Role::Admin]);
        assert_eq!(decide(&cmd), GuardDecision::Render);

        cmd.require_profile = true;
        assert_eq!(decide(&cmd), GuardDecision::Loading);
    }

    #[test]
    fn test_configured_targets_are_used() {
        let mut config = AppConfig::default();
        config.navigation.unauthorized = "/403".to_string();
        let cmd = command(SimulatedState::SignedIn, Some(Role::Volunteer), &[Role::Admin, Role::SubAdmin]);

        let decision = AccessGuard::new(cmd.policy(&config)).evaluate(&cmd.snapshot());

        assert_eq!(decision, GuardDecision::Redirect("/403".to_string()));
    }

    #[test]
    fn test_report_shape() {
        let json = report(&GuardDecision::Redirect("/auth/login".to_string()));
        assert_eq!(json, serde_json::json!({ "decision": "redirect", "target": "/auth/login" }));
    }
}
