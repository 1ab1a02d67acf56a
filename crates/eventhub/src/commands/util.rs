//! Shared helpers for command handlers.

use eventhub_core::{Hub, TicketBook};

use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Fail early with a profile-aware message when no session is stored.
pub fn require_login(hub: &Hub, profile: &str) -> Result<(), CliError> {
    if hub.session().is_none() {
        return Err(CliError::NotLoggedIn {
            profile: profile.to_owned(),
        });
    }
    Ok(())
}

/// The signed-in user's tickets, behind a spinner.
pub async fn load_tickets(hub: &Hub, quiet: bool) -> Result<TicketBook, CliError> {
    let spinner = crate::output::spinner("Loading tickets...", quiet);
    let result = hub.my_tickets().await;
    spinner.finish_and_clear();
    Ok(result?)
}
