use tracing::debug;

use shared_config::AppConfig;
use shared_utils::jwt;

use crate::models::{Access, GuardOutcome, View};

/// Decides, per navigation attempt, whether a view renders or where the
/// user is sent instead. An expired or undecodable token counts as no session.
#[derive(Debug, Clone)]
pub struct AccessGate {
    admin_role: String,
}

impl AccessGate {
    pub fn new(admin_role: impl Into<String>) -> Self {
        Self {
            admin_role: admin_role.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.admin_role.clone())
    }

    pub fn evaluate(&self, target: &View, token: Option<&str>) -> GuardOutcome {
        let session = token.filter(|t| jwt::is_valid(t));

        let outcome = match (target.access(), session) {
            (Access::GuestOnly, Some(_)) => GuardOutcome::Redirect(View::Home),
            (Access::GuestOnly, None) => GuardOutcome::Render(target.clone()),
            (_, None) => GuardOutcome::Redirect(View::Login),
            (Access::Admin, Some(token)) if !jwt::has_role(token, &self.admin_role) => {
                GuardOutcome::Redirect(View::DEFAULT_AUTHENTICATED)
            }
            (_, Some(_)) => GuardOutcome::Render(target.clone()),
        };

        if outcome.is_redirect() {
            debug!("Navigation to {} redirected to {}", target, outcome.view());
        }

        outcome
    }
}
