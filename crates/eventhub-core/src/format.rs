// ── Display formatting ──
//
// Date and money rendering shared by the validation view, ticket
// listings, and the printable ticket document. Backend timestamps are
// either RFC 3339 (`2025-12-01T10:00:00Z`) or zone-less `LocalDateTime`
// text (`2025-12-01T10:00:00`); both are shown in their own wall-clock
// time, never converted.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::model::PLACEHOLDER;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a backend timestamp into its wall-clock time.
pub fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Parse a backend timestamp as UTC. Zone-less values are taken as UTC.
pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_wall_clock(raw).map(|naive| naive.and_utc())
}

/// `Mon, Dec 1, 2025, 10:00 AM`: validation view.
pub fn date_time(raw: Option<&str>) -> String {
    render(raw, "%a, %b %-d, %Y, %I:%M %p")
}

/// `Dec 1, 2025`: ticket listings.
pub fn short_date(raw: Option<&str>) -> String {
    render(raw, "%b %-d, %Y")
}

/// `Monday, December 1, 2025`: printable ticket.
pub fn long_date(raw: Option<&str>) -> String {
    render(raw, "%A, %B %-d, %Y")
}

/// `10:00 AM`: printable ticket.
pub fn time_of_day(raw: Option<&str>) -> String {
    render(raw, "%I:%M %p")
}

/// `$19.99`
pub fn price(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Unknown dates render as the placeholder; unparseable ones verbatim.
fn render(raw: Option<&str>, fmt: &str) -> String {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => PLACEHOLDER.to_owned(),
        Some(raw) => parse_wall_clock(raw)
            .map_or_else(|| raw.to_owned(), |dt| dt.format(fmt).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_and_local_parse_to_same_wall_clock() {
        let a = parse_wall_clock("2025-12-01T10:00:00Z");
        let b = parse_wall_clock("2025-12-01T10:00:00");
        let c = parse_wall_clock("2025-12-01T10:00:00.123");
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(
            c.map(|dt| dt.format("%H:%M").to_string()).as_deref(),
            Some("10:00")
        );
    }

    #[test]
    fn formats_match_the_web_views() {
        let raw = Some("2025-12-01T10:00:00Z");
        assert_eq!(date_time(raw), "Mon, Dec 1, 2025, 10:00 AM");
        assert_eq!(short_date(raw), "Dec 1, 2025");
        assert_eq!(long_date(raw), "Monday, December 1, 2025");
        assert_eq!(time_of_day(Some("2025-12-01T21:05:00")), "09:05 PM");
    }

    #[test]
    fn unknown_and_garbage_dates() {
        assert_eq!(date_time(None), "TBD");
        assert_eq!(date_time(Some("  ")), "TBD");
        assert_eq!(short_date(Some("next tuesday")), "next tuesday");
    }

    #[test]
    fn zone_less_utc_parse() {
        let dt = parse_utc("2025-11-20T09:15:00").map(|d| d.to_rfc3339());
        assert_eq!(dt.as_deref(), Some("2025-11-20T09:15:00+00:00"));
    }

    #[test]
    fn price_has_two_decimals() {
        assert_eq!(price(19.99), "$19.99");
        assert_eq!(price(0.0), "$0.00");
        assert_eq!(price(5.5), "$5.50");
    }
}
