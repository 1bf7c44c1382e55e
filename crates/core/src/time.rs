//! Time source and the timestamp formats used for quiz results.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Date-only formats written by older builds of the history ledger, tried in
/// order. Slash dates are month-first; day-first only matches when the first
/// field cannot be a month.
const LEGACY_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d",
];

/// Where "now" comes from when a quiz completes.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

/// Canonical text form of a completion timestamp (RFC 3339, whole seconds).
#[must_use]
pub fn format_completed_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Parse a completion timestamp.
///
/// RFC 3339 is the canonical form. Legacy date-only values (`11/14/2023`,
/// `14/11/2023`, `14.11.2023`, `2023-11-14`, `2023/11/14`) are read as
/// midnight UTC of that day.
#[must_use]
pub fn parse_completed_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    LEGACY_DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| midnight.and_utc())
    })
}

/// 2023-11-14T22:13:20Z, the instant every test quiz completes at.
///
/// # Panics
///
/// Never in practice; the literal date is valid.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20)
        .single()
        .expect("literal test timestamp is valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_does_not_move() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp(), 1_700_000_000);
    }

    #[test]
    fn system_clock_is_default() {
        assert!(matches!(Clock::default(), Clock::System));
    }

    #[test]
    fn completed_at_round_trips_through_text() {
        let text = format_completed_at(fixed_now());
        assert_eq!(text, "2023-11-14T22:13:20+00:00");
        assert_eq!(parse_completed_at(&text), Some(fixed_now()));
    }

    #[test]
    fn legacy_dates_read_as_midnight_utc() {
        let midnight = Utc.with_ymd_and_hms(2023, 11, 14, 0, 0, 0).single();
        assert_eq!(parse_completed_at("11/14/2023"), midnight);
        assert_eq!(parse_completed_at(" 2023-11-14 "), midnight);
        assert_eq!(parse_completed_at("14/11/2023"), midnight);
        assert_eq!(parse_completed_at("14.11.2023"), midnight);
        assert_eq!(parse_completed_at("2023/11/14"), midnight);
        assert_eq!(parse_completed_at("yesterday"), None);
    }

    #[test]
    fn ambiguous_slash_dates_are_month_first() {
        let november_tenth = Utc.with_ymd_and_hms(2023, 11, 10, 0, 0, 0).single();
        assert_eq!(parse_completed_at("11/10/2023"), november_tenth);
    }
}
