//! Session command handlers: login, logout, whoami.

use std::io::BufRead;

use dialoguer::Input;
use secrecy::SecretString;

use eventhub_config::{SessionStore, StoredSession};
use eventhub_core::Hub;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

pub async fn login(
    hub: &mut Hub,
    store: &SessionStore,
    args: &LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let email = match &args.email {
        Some(email) => email.clone(),
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = read_password(args.password_stdin)?;
    if email.trim().is_empty() {
        return Err(CliError::Validation {
            field: "email".into(),
            reason: "cannot be empty".into(),
        });
    }

    let spinner = output::spinner("Signing in...", global.quiet);
    let result = hub.login(email.trim(), &password).await;
    spinner.finish_and_clear();
    let session = result?;

    store.save(&session)?;
    if !global.quiet {
        eprintln!(
            "✓ Logged in as {} <{}> ({}) on profile '{}'",
            session.display_name,
            session.email,
            session.role,
            store.profile()
        );
    }
    Ok(())
}

fn read_password(from_stdin: bool) -> Result<SecretString, CliError> {
    let raw = if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password("Password: ").map_err(prompt_err)?
    };
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(SecretString::from(raw))
}

pub fn logout(hub: &mut Hub, store: &SessionStore, global: &GlobalOpts) -> Result<(), CliError> {
    let had_session = store.clear()?;
    hub.logout();
    if !global.quiet {
        if had_session {
            eprintln!("✓ Logged out of profile '{}'", store.profile());
        } else {
            eprintln!("No stored session for profile '{}'", store.profile());
        }
    }
    Ok(())
}

pub fn whoami(hub: &Hub, store: &SessionStore, global: &GlobalOpts) -> Result<(), CliError> {
    let session = hub.session().ok_or_else(|| CliError::NotLoggedIn {
        profile: store.profile().to_owned(),
    })?;
    let identity = StoredSession::from_context(session);
    let out = output::render_single(
        global.output,
        &identity,
        |s| {
            format!(
                "Name:     {}\nEmail:    {}\nUser ID:  {}\nRole:     {}\nProfile:  {}",
                s.display_name,
                s.email,
                s.user_id,
                s.role,
                store.profile()
            )
        },
        |s| s.email.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
