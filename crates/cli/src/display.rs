//! Terminal rendering shared by the commands and the interactive mode

use std::time::Duration;

use console::{style, Style};
use indicatif::{ProgressBar, ProgressStyle};
use rbac::{role_badge, BadgeColor};
use session::{AuthSnapshot, GuardDecision, Navigator};
use shared::Role;
use tokio::sync::watch;

const WAIT_LIMIT: Duration = Duration::from_secs(10);

/// Colored `[Label]` badge for a role
pub fn badge(role: Role) -> String {
    let badge = role_badge(role);
    let color = match badge.color {
        BadgeColor::Red => Style::new().red(),
        BadgeColor::Orange => Style::new().color256(208),
        BadgeColor::Blue => Style::new().blue(),
        BadgeColor::Gray => Style::new().color256(245),
    };
    color.bold().apply_to(format!("[{}]", badge.label)).to_string()
}

/// One-line description of a guard decision
pub fn describe_decision(decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Loading => format!("{} (still loading)", style("wait").yellow()),
        GuardDecision::Redirect(target) => format!("{} to {}", style("redirect").red(), target),
        GuardDecision::Render => style("render").green().to_string(),
    }
}

/// Navigator that just reports where it would go
pub struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, target: &str) {
        println!("  {} {}", style("->").dim(), style(target).cyan());
    }
}

/// Wait for the session state to satisfy `condition`, with a spinner
pub async fn wait_with_spinner(
    states: &mut watch::Receiver<AuthSnapshot>,
    message: &str,
    condition: impl FnMut(&AuthSnapshot) -> bool,
) -> anyhow::Result<AuthSnapshot> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let outcome = tokio::time::timeout(WAIT_LIMIT, states.wait_for(condition)).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(Ok(snapshot)) => Ok(AuthSnapshot::clone(&snapshot)),
        Ok(Err(_)) => anyhow::bail!("session provider stopped"),
        Err(_) => anyhow::bail!("timed out: {message}"),
    }
}
