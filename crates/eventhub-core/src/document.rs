// ── Printable ticket document ──
//
// A standalone HTML page (inline CSS, no external assets) that a holder
// can print or present at the venue entrance.

use std::fmt;

use url::Url;

use crate::format;
use crate::model::{Event, Ticket};

const UNKNOWN_VENUE: &str = "Venue TBD";
const UNKNOWN_TITLE: &str = "Event";

const STYLE: &str = r"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    @page { size: A4; margin: 0; }
    body {
      font-family: 'Segoe UI', Arial, sans-serif;
      background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
      padding: 40px 20px;
      display: flex; align-items: center; justify-content: center;
    }
    .ticket { background: #fff; max-width: 900px; width: 100%; border-radius: 24px; overflow: hidden; }
    .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: #fff; padding: 45px 50px; text-align: center; }
    .header h1 { font-size: 36px; font-weight: 900; letter-spacing: 3px; text-transform: uppercase; }
    .header p { font-size: 16px; letter-spacing: 2px; opacity: 0.95; }
    .body { padding: 50px; }
    .event-name { font-size: 40px; font-weight: 900; color: #4c1d95; text-align: center; margin-bottom: 40px; }
    .grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 25px; margin-bottom: 35px; }
    .card { background: #f8fafc; padding: 25px; border-radius: 16px; border: 2px solid #e2e8f0; }
    .label { font-size: 11px; color: #64748b; text-transform: uppercase; letter-spacing: 1.5px; margin-bottom: 10px; font-weight: 700; }
    .value { font-size: 20px; color: #1a202c; font-weight: 700; }
    .badge { display: inline-block; padding: 10px 25px; border-radius: 25px; font-size: 14px; color: #fff; text-transform: uppercase; }
    .status-active { background: #059669; }
    .status-other { background: #d97706; }
    .ticket-id { padding: 30px; border-radius: 16px; border: 3px dashed #667eea; text-align: center; }
    .ticket-id .value { font-size: 42px; color: #667eea; font-family: 'Courier New', monospace; letter-spacing: 6px; }
    .verify { margin-top: 20px; text-align: center; font-size: 13px; word-break: break-all; }
    .footer { background: #f1f5f9; padding: 35px 50px; border-top: 4px solid #667eea; display: grid; grid-template-columns: 2fr 1fr; gap: 30px; }
    .notice { color: #475569; font-size: 14px; line-height: 1.8; }
    .brand { text-align: center; font-size: 24px; font-weight: 900; color: #764ba2; }
    .brand small { display: block; font-size: 12px; color: #94a3b8; font-weight: 600; }
    @media print { body { background: #fff; padding: 0; } .ticket { border-radius: 0; } }
    @media (max-width: 768px) { .grid, .footer { grid-template-columns: 1fr; } }
";

const NOTICE: &str = "This ticket is valid for one (1) person only. Present this ticket at the \
    venue entrance for verification. Keep your ticket ID safe and do not share it with others. \
    For any queries or support, please contact the event organizers.";

/// Printable ticket for one holder's admission to one event.
#[derive(Debug, Clone)]
pub struct TicketDocument {
    ticket: Ticket,
    event: Option<Event>,
    count: u32,
    validation_url: Option<Url>,
}

impl TicketDocument {
    /// `count` is how many tickets the holder has for this event; the
    /// document shows it along with the total amount.
    pub fn new(ticket: Ticket, event: Option<Event>, count: u32) -> Self {
        Self {
            ticket,
            event,
            count: count.max(1),
            validation_url: None,
        }
    }

    /// Print the validation link under the ticket ID.
    #[must_use]
    pub fn with_validation_url(mut self, url: Url) -> Self {
        self.validation_url = Some(url);
        self
    }

    fn title(&self) -> &str {
        self.event
            .as_ref()
            .map(|e| e.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_TITLE)
    }

    /// `ticket-<title>-<SHORTID>.html`, with every character of the title
    /// that is not an ASCII letter or digit replaced by `-`.
    pub fn file_name(&self) -> String {
        let title: String = self
            .title()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        format!("ticket-{title}-{}.html", self.ticket.short_number())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TicketDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = escape(self.title());
        let start = self.event.as_ref().and_then(|e| e.start_date.as_deref());
        let location = self
            .event
            .as_ref()
            .and_then(|e| e.location.as_deref())
            .filter(|l| !l.is_empty())
            .unwrap_or(UNKNOWN_VENUE);
        let plural = if self.count == 1 { "" } else { "s" };
        let status = self.ticket.status.trim().to_uppercase();
        let badge = if status == "ACTIVE" {
            "status-active"
        } else {
            "status-other"
        };

        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "  <meta charset=\"UTF-8\">")?;
        writeln!(
            f,
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(f, "  <title>Event Ticket - {title}</title>")?;
        writeln!(f, "  <style>{STYLE}  </style>")?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "<div class=\"ticket\">")?;
        writeln!(f, "  <div class=\"header\">")?;
        writeln!(f, "    <h1>Official Event Pass</h1>")?;
        writeln!(f, "    <p>Premium Access Ticket</p>")?;
        writeln!(f, "  </div>")?;
        writeln!(f, "  <div class=\"body\">")?;
        writeln!(f, "    <div class=\"event-name\">{title}</div>")?;
        writeln!(f, "    <div class=\"grid\">")?;
        card(f, "Date", &escape(&format::long_date(start)))?;
        card(f, "Time", &escape(&format::time_of_day(start)))?;
        card(f, "Location", &escape(location))?;
        card(f, "Tickets", &format!("{} Ticket{plural}", self.count))?;
        card(
            f,
            "Total Amount",
            &format::price(self.ticket.price * f64::from(self.count)),
        )?;
        card(
            f,
            "Status",
            &format!(
                "<span class=\"badge {badge}\">{}</span>",
                escape(&status)
            ),
        )?;
        writeln!(f, "    </div>")?;
        writeln!(f, "    <div class=\"ticket-id\">")?;
        writeln!(f, "      <div class=\"label\">Ticket ID</div>")?;
        writeln!(
            f,
            "      <div class=\"value\">{}</div>",
            escape(&self.ticket.short_number())
        )?;
        writeln!(f, "    </div>")?;
        if let Some(ref url) = self.validation_url {
            let href = escape(url.as_str());
            writeln!(
                f,
                "    <p class=\"verify\">Verify at <a href=\"{href}\">{href}</a></p>"
            )?;
        }
        writeln!(f, "  </div>")?;
        writeln!(f, "  <div class=\"footer\">")?;
        writeln!(f, "    <div>")?;
        writeln!(f, "      <div class=\"label\">Important Notice</div>")?;
        writeln!(f, "      <p class=\"notice\">{NOTICE}</p>")?;
        writeln!(f, "    </div>")?;
        writeln!(
            f,
            "    <div class=\"brand\">EventHub<small>Premium Events Platform</small></div>"
        )?;
        writeln!(f, "  </div>")?;
        writeln!(f, "</div>")?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

/// `value_html` must already be escaped.
fn card(f: &mut fmt::Formatter<'_>, label: &str, value_html: &str) -> fmt::Result {
    writeln!(f, "      <div class=\"card\">")?;
    writeln!(f, "        <div class=\"label\">{label}</div>")?;
    writeln!(f, "        <div class=\"value\">{value_html}</div>")?;
    writeln!(f, "      </div>")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::RecordId;

    fn ticket(status: &str) -> Ticket {
        Ticket {
            id: Some(1),
            ticket_number: "abcdef1234567890".into(),
            registration_id: None,
            event_id: RecordId::Number(42),
            user_id: RecordId::Number(7),
            status: status.into(),
            price: 19.99,
            seat_number: None,
            issued_at: None,
            created_at: None,
            has_qr_image: false,
        }
    }

    fn event(title: &str) -> Event {
        Event {
            id: RecordId::Number(42),
            title: title.into(),
            location: Some("Hall A".into()),
            start_date: Some("2025-12-01T10:00:00Z".into()),
            active: true,
            ..Event::default()
        }
    }

    #[test]
    fn file_name_is_sanitized() {
        let doc = TicketDocument::new(ticket("ACTIVE"), Some(event("Rock & Roll: Live!")), 1);
        assert_eq!(doc.file_name(), "ticket-rock---roll--live--ABCDEF12.html");
    }

    #[test]
    fn file_name_without_event() {
        let doc = TicketDocument::new(ticket("ACTIVE"), None, 1);
        assert_eq!(doc.file_name(), "ticket-event-ABCDEF12.html");
    }

    #[test]
    fn renders_event_details() {
        let html = TicketDocument::new(ticket("active"), Some(event("Demo Con")), 3).render();

        assert!(html.contains("Official Event Pass"));
        assert!(html.contains("<title>Event Ticket - Demo Con</title>"));
        assert!(html.contains("Monday, December 1, 2025"));
        assert!(html.contains("10:00 AM"));
        assert!(html.contains("Hall A"));
        assert!(html.contains("3 Tickets"));
        assert!(html.contains("$59.97"));
        assert!(html.contains("badge status-active\">ACTIVE"));
        assert!(html.contains("ABCDEF12"));
        assert!(html.contains("valid for one (1) person only"));
    }

    #[test]
    fn unknown_event_uses_placeholders() {
        let html = TicketDocument::new(ticket("PENDING"), None, 1).render();

        assert!(html.contains("Venue TBD"));
        assert!(html.contains("1 Ticket<"));
        assert!(html.contains("$19.99"));
        assert!(html.contains("status-other"));
    }

    #[test]
    fn interpolated_text_is_escaped() {
        let mut evt = event("<script>alert('x')</script>");
        evt.location = Some("\"Main\" & Side".into());
        let html = TicketDocument::new(ticket("ACTIVE"), Some(evt), 1).render();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("&quot;Main&quot; &amp; Side"));
    }

    #[test]
    fn validation_link_is_optional() {
        let plain = TicketDocument::new(ticket("ACTIVE"), Some(event("Demo Con")), 1);
        assert!(!plain.render().contains("Verify at"));

        let url = Url::parse("https://example.com/validate/abc?d=x&y=1").unwrap();
        let linked = plain.with_validation_url(url);
        assert!(
            linked
                .render()
                .contains("href=\"https://example.com/validate/abc?d=x&amp;y=1\"")
        );
    }
}
