//! Ticket command handlers.

use serde::Serialize;
use tabled::Tabled;
use url::Url;

use eventhub_config::SessionStore;
use eventhub_core::{Event, Hub, RecordId, Ticket, TicketGroup, Validity, format};

use crate::cli::{GlobalOpts, TicketsArgs, TicketsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

/// Serialized shape of one event's tickets.
#[derive(Serialize)]
struct GroupView<'a> {
    event_id: &'a RecordId,
    event: Option<&'a Event>,
    tickets: &'a [Ticket],
    total_price: f64,
}

impl<'a> From<&'a TicketGroup> for GroupView<'a> {
    fn from(g: &'a TicketGroup) -> Self {
        Self {
            event_id: &g.event_id,
            event: g.event.as_ref(),
            tickets: &g.tickets,
            total_price: g.total_price(),
        }
    }
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Venue")]
    venue: String,
    #[tabled(rename = "Tickets")]
    tickets: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&GroupView<'_>> for GroupRow {
    fn from(g: &GroupView<'_>) -> Self {
        let ids: Vec<String> = g.tickets.iter().map(Ticket::short_number).collect();
        let valid = g
            .tickets
            .iter()
            .filter(|t| t.validity() == Validity::Valid)
            .count();
        Self {
            event: g.event.map_or_else(
                || format!("Event {}", g.event_id),
                |e| e.display_title().to_owned(),
            ),
            date: format::short_date(g.event.and_then(|e| e.start_date.as_deref())),
            venue: g
                .event
                .map_or(eventhub_core::model::PLACEHOLDER, Event::display_location)
                .to_owned(),
            tickets: ids.join(", "),
            status: format!("{valid}/{} valid", g.tickets.len()),
            total: format::price(g.total_price),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    hub: &Hub,
    store: &SessionStore,
    args: TicketsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_login(hub, store.profile())?;

    match args.command {
        TicketsCommand::List => {
            let book = util::load_tickets(hub, global.quiet).await?;
            let groups = book.groups();
            let views: Vec<GroupView<'_>> = groups.iter().map(GroupView::from).collect();
            if views.is_empty() && global.output == crate::cli::OutputFormat::Table {
                if !global.quiet {
                    eprintln!("No tickets yet. Browse events with: eventhub events list");
                }
                return Ok(());
            }
            let out = output::render_list(global.output, &views, |g| GroupRow::from(g), |g| {
                g.tickets
                    .iter()
                    .map(|t| t.ticket_number.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Link { ticket, origin } => {
            let origin = origin
                .as_deref()
                .map(|raw| {
                    Url::parse(raw).map_err(|e| CliError::Validation {
                        field: "origin".into(),
                        reason: format!("invalid URL '{raw}': {e}"),
                    })
                })
                .transpose()?;
            let spinner = output::spinner("Building link...", global.quiet);
            let result = hub.share_link(&ticket, origin.as_ref()).await;
            spinner.finish_and_clear();
            let link = result?.to_string();

            let out = output::render_single(global.output, &link, String::clone, String::clone)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TicketsCommand::Download { ticket, out } => {
            let spinner = output::spinner("Preparing ticket...", global.quiet);
            let result = hub.ticket_document(&ticket).await;
            spinner.finish_and_clear();
            let document = result?;

            std::fs::create_dir_all(&out)?;
            let path = out.join(document.file_name());
            std::fs::write(&path, document.render())?;
            tracing::info!(path = %path.display(), "ticket written");

            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        TicketsCommand::CheckIn { ticket } => {
            hub.check_in(&ticket).await?;
            if !global.quiet {
                eprintln!("✓ Ticket {} checked in", eventhub_core::short_ticket_number(&ticket));
            }
            Ok(())
        }
    }
}
