mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eventhub_config::{Config, Overrides, SessionStore};
use eventhub_core::Hub;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "eventhub", &mut std::io::stdout());
            Ok(())
        }

        // Decoding a link is purely local
        Command::Decode(args) => commands::validate::decode(&args, &cli.global),

        // Offline validation never builds an HTTP client
        Command::Validate(args) if args.offline => {
            commands::validate::handle(&eventhub_core::OfflineLookup, &args, &cli.global).await
        }

        // All other commands talk to the backend
        cmd => {
            let (hub, store) = connect(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, hub, &store, &cli.global).await
        }
    }
}

/// Build a `Hub` from the config file, profile, and CLI overrides, and
/// restore the profile's stored session if there is one.
fn connect(global: &GlobalOpts) -> Result<(Hub, SessionStore), CliError> {
    let cfg = eventhub_config::load_config()?;
    let profile_name = cfg.active_profile_name(global.profile.as_deref());
    let client_config = resolve(&cfg, &profile_name, global)?;

    let store = SessionStore::new(&profile_name);
    let mut hub = Hub::new(&client_config)?;
    match store.load() {
        Ok(Some(session)) => {
            tracing::debug!(profile = %profile_name, user = %session.email, "restored session");
            hub = hub.with_session(session);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable session"),
    }
    Ok((hub, store))
}

fn resolve(
    cfg: &Config,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<eventhub_core::ClientConfig, CliError> {
    let overrides = Overrides {
        backend: global.backend.clone(),
        origin: global.origin.clone(),
        insecure: global.insecure,
        timeout: global.timeout,
    };
    Ok(cfg.resolve(profile_name, &overrides)?)
}
