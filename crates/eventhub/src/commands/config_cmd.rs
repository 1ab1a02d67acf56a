//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use eventhub_config::{self as config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |_| "config".into(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let default = cfg.active_profile_name(None);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: eventhub config init");
                return Ok(());
            }
            let mut names: Vec<&String> = cfg.profiles.keys().collect();
            names.sort();
            for name in names {
                let marker = if *name == default { " *" } else { "" };
                println!("{name}{marker}");
            }
            Ok(())
        }

        // ── Set-default <name> ──────────────────────────────────────
        ConfigCommand::SetDefault { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: cfg.profile_names(),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("EventHub CLI configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Gateway + public site
    let backend: String = Input::new()
        .with_prompt("API gateway URL")
        .default("http://localhost:8080".into())
        .interact_text()
        .map_err(prompt_err)?;
    let origin: String = Input::new()
        .with_prompt("Public site URL (used in ticket links)")
        .default(cfg.defaults.origin.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        backend,
        origin: Some(origin),
        ..Profile::default()
    };

    // 3. Optional direct service routing
    let direct = Confirm::new()
        .with_prompt("Talk to the auth, event, and ticket services directly?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    if direct {
        profile.auth_url = Some(prompt_url("Auth service URL", "http://localhost:8081")?);
        profile.events_url = Some(prompt_url("Event service URL", "http://localhost:8082")?);
        profile.tickets_url = Some(prompt_url("Ticket service URL", "http://localhost:8083")?);
    }

    // 4. Validate before writing
    config::resolve_client_config(&profile, &cfg.defaults, &config::Overrides::default())?;

    cfg.profiles.insert(profile_name.clone(), profile);
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Next: eventhub login");
    Ok(())
}

fn prompt_url(prompt: &str, default: &str) -> Result<String, CliError> {
    Input::new()
        .with_prompt(prompt)
        .default(default.to_owned())
        .interact_text()
        .map_err(prompt_err)
}
