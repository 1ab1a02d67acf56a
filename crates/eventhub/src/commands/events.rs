//! Event command handlers.

use tabled::Tabled;

use eventhub_core::{Event, Hub, RecordId, format};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Venue")]
    venue: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Available")]
    available: String,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id.to_string(),
            title: e.display_title().to_owned(),
            category: e.category.clone().unwrap_or_default(),
            date: format::short_date(e.start_date.as_deref()),
            venue: e.display_location().to_owned(),
            price: e.price.map(format::price).unwrap_or_default(),
            available: availability(e),
        }
    }
}

fn availability(e: &Event) -> String {
    if e.is_sold_out() {
        return "sold out".into();
    }
    match (e.available_tickets, e.total_tickets) {
        (Some(left), Some(total)) => format!("{left}/{total}"),
        (Some(left), None) => left.to_string(),
        _ => "-".into(),
    }
}

fn detail(e: &Event) -> String {
    let mut lines = vec![
        format!("ID:          {}", e.id),
        format!("Title:       {}", e.display_title()),
        format!("Category:    {}", e.category.as_deref().unwrap_or("-")),
        format!("Starts:      {}", format::date_time(e.start_date.as_deref())),
        format!("Ends:        {}", format::date_time(e.end_date.as_deref())),
        format!("Venue:       {}", e.display_location()),
        format!(
            "Price:       {}",
            e.price.map_or_else(|| "-".into(), format::price)
        ),
        format!("Available:   {}", availability(e)),
        format!("Organizer:   {}", e.organizer.as_deref().unwrap_or("-")),
        format!("Active:      {}", e.active),
    ];
    if let Some(description) = e.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push(description.to_owned());
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(hub: &Hub, args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List { category, search } => {
            let spinner = output::spinner("Loading events...", global.quiet);
            let result = match (category, search) {
                (Some(category), _) => hub.events_in_category(&category).await,
                (None, Some(keyword)) => hub.search_events(&keyword).await,
                (None, None) => hub.list_events().await,
            };
            spinner.finish_and_clear();
            let events = result?;

            let out = output::render_list(
                global.output,
                &events,
                |e| EventRow::from(e),
                |e| e.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Show { id } => {
            let event = hub.event(&parse_id(&id)).await?;
            let out = output::render_single(global.output, &event, detail, |e| e.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn parse_id(raw: &str) -> RecordId {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map_or_else(|_| RecordId::from(raw), RecordId::Number)
}
