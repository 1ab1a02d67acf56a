//! Command dispatch: bridges CLI args -> Hub operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod events;
pub mod tickets;
pub mod util;
pub mod validate;

use eventhub_config::SessionStore;
use eventhub_core::Hub;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    mut hub: Hub,
    store: &SessionStore,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(&mut hub, store, &args, global).await,
        Command::Logout => auth::logout(&mut hub, store, global),
        Command::Whoami => auth::whoami(&hub, store, global),
        Command::Events(args) => events::handle(&hub, args, global).await,
        Command::Tickets(args) => tickets::handle(&hub, store, args, global).await,
        Command::Validate(args) => validate::handle(hub.client(), &args, global).await,
        // Config, Completions and Decode are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Decode(_) => unreachable!(),
    }
}
