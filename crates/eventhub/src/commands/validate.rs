//! Validate and decode scanned ticket links.

use std::fmt::Write as _;

use tokio_util::sync::CancellationToken;
use url::Url;

use eventhub_core::format;
use eventhub_core::{
    TicketLookup, ValidatedTicket, ValidationPayload, ValidationSource, parse_validation_url,
    resolve_validation_url,
};

use crate::cli::{DecodeArgs, GlobalOpts, ValidateArgs};
use crate::error::CliError;
use crate::output;

// ── Validate ────────────────────────────────────────────────────────

/// Validate a link against `lookup`. Ctrl-C abandons an in-flight backend
/// lookup.
pub async fn handle<L: TicketLookup + Sync>(
    lookup: &L,
    args: &ValidateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let url = parse_link(&args.url)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let spinner = output::spinner("Validating ticket...", global.quiet);
    let result = resolve_validation_url(lookup, &url, &cancel).await;
    spinner.finish_and_clear();
    interrupt.abort();

    let validated = result?;
    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &validated,
        |v| detail(v, color),
        |v| v.validity.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(v: &ValidatedTicket, color: bool) -> String {
    let verdict = if v.is_valid() {
        output::green("✓ VALID", color)
    } else {
        output::yellow("! CHECK STATUS", color)
    };
    let event = v.event.as_ref();

    let mut out = String::new();
    let _ = writeln!(out, "{verdict}\n");
    let _ = writeln!(out, "  Ticket:   {}", v.ticket.short_number());
    let _ = writeln!(out, "  Number:   {}", v.ticket.ticket_number);
    let _ = writeln!(
        out,
        "  Event:    {}",
        event.map_or(eventhub_core::model::PLACEHOLDER, |e| e.display_title())
    );
    let _ = writeln!(
        out,
        "  Date:     {}",
        format::date_time(event.and_then(|e| e.start_date.as_deref()))
    );
    let _ = writeln!(
        out,
        "  Venue:    {}",
        event.map_or(eventhub_core::model::PLACEHOLDER, |e| e.display_location())
    );
    let _ = writeln!(out, "  Status:   {}", v.ticket.status);
    let _ = writeln!(out, "  Price:    {}", format::price(v.ticket.price));
    let source = match v.source {
        ValidationSource::Backend => "ticket service".to_owned(),
        ValidationSource::Embedded => {
            format!("link {}", output::dim("(unverified offline snapshot)", color))
        }
    };
    let _ = write!(out, "  Source:   {source}");
    out
}

// ── Decode ──────────────────────────────────────────────────────────

/// Print the snapshot embedded in a link without contacting anything.
pub fn decode(args: &DecodeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let url = parse_link(&args.url)?;
    let link = parse_validation_url(&url).ok_or_else(|| CliError::InvalidLink {
        url: args.url.clone(),
    })?;
    let data = link.data.ok_or_else(|| CliError::Decode {
        reason: "the link has no embedded snapshot".into(),
    })?;
    let payload = ValidationPayload::decode(&data).map_err(|e| CliError::Decode {
        reason: e.to_string(),
    })?;
    if payload.ticket_number != link.ticket_number {
        tracing::warn!(
            path = %link.ticket_number,
            embedded = %payload.ticket_number,
            "embedded ticket number differs from the link path"
        );
    }

    let out = output::render_single(
        global.output,
        &payload,
        payload_detail,
        |p| p.ticket_number.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn payload_detail(p: &ValidationPayload) -> String {
    let or_placeholder = |s: &str| {
        if s.is_empty() {
            eventhub_core::model::PLACEHOLDER.to_owned()
        } else {
            s.to_owned()
        }
    };
    [
        format!("Ticket:    {}", p.ticket_number),
        format!("Event ID:  {}", or_placeholder(&p.event_id.to_string())),
        format!("Event:     {}", p.event_title),
        format!("Date:      {}", or_placeholder(&p.event_start_date)),
        format!("Venue:     {}", or_placeholder(&p.event_location)),
        format!("Status:    {}", p.status),
        format!("Price:     {}", format::price(p.price)),
        format!("User ID:   {}", or_placeholder(&p.user_id.to_string())),
    ]
    .join("\n")
}

fn parse_link(raw: &str) -> Result<Url, CliError> {
    Url::parse(raw.trim()).map_err(|_| CliError::InvalidLink { url: raw.to_owned() })
}
