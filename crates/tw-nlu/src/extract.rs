//! Reservation intent extraction from free chat text.
//!
//! Parsers run in a fixed order over a working copy of the message:
//! date, then time, then party size. Each parser blanks out the spans it
//! matched before the next one runs, so the digits of `2025-03-01` or
//! `7:30 pm` can never be re-read as a party size.
//!
//! Missing or unusable fields fall back to defaults (tomorrow, `7:00 PM`,
//! 2 guests). Extraction never fails.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Days, Local, NaiveDate};
use regex::Regex;
use tw_protocol::chat::{DEFAULT_PARTY_SIZE, DEFAULT_TIME, ReservationIntent};
use tw_protocol::reservation::{DATE_FORMAT, parse_date};

static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap());

// The hour may be glued to a preceding word ("at7pm") but not to other digits.
static RE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|\D)(?P<time>(?P<hour>\d{1,2})(?::\d{2})?\s*(?P<meridiem>am|pm))\b")
        .unwrap()
});

static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+\b").unwrap());

/// Pulls date, time and party size out of a chat message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationExtractor;

impl ReservationExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract using the local calendar date for the "tomorrow" default.
    pub fn extract(&self, message: &str) -> ReservationIntent {
        self.extract_at(message, Local::now().date_naive())
    }

    /// Extract with an explicit "today".
    pub fn extract_at(&self, message: &str, today: NaiveDate) -> ReservationIntent {
        let mut working = message.to_string();

        let date = take_date(&mut working);
        let time = take_time(&mut working);
        let guests = take_party_size(&mut working);

        tracing::debug!(
            date_found = date.is_some(),
            time_found = time.is_some(),
            guests_found = guests.is_some(),
            "extracted reservation fields"
        );

        ReservationIntent {
            date: date.unwrap_or_else(|| tomorrow(today)),
            time: time.unwrap_or_else(|| DEFAULT_TIME.to_string()),
            guests: guests.unwrap_or(DEFAULT_PARTY_SIZE),
        }
    }
}

/// Normalize a time like `"7 PM"` to `"7:00 PM"`.
///
/// Text that already contains a colon, or that is not a time, is returned
/// unchanged. The meridiem keeps the case it was typed in.
pub fn normalize_time(raw: &str) -> String {
    if raw.contains(':') {
        return raw.to_string();
    }
    match RE_TIME.captures(raw) {
        Some(caps) => format!("{}:00 {}", &caps["hour"], &caps["meridiem"]),
        None => raw.to_string(),
    }
}

/// First calendar-valid `YYYY-MM-DD` date. Every date-shaped span is
/// consumed, valid or not.
fn take_date(working: &mut String) -> Option<String> {
    let spans: Vec<Range<usize>> = RE_DATE.find_iter(working).map(|m| m.range()).collect();
    let date = spans
        .iter()
        .map(|r| &working[r.clone()])
        .find(|s| parse_date(s).is_some())
        .map(String::from);
    blank_spans(working, &spans);
    date
}

fn take_time(working: &mut String) -> Option<String> {
    let m = RE_TIME.captures(working)?.name("time")?;
    let time = normalize_time(m.as_str());
    let span = m.range();
    blank_spans(working, &[span]);
    Some(time)
}

/// First standalone positive integer left in the text.
fn take_party_size(working: &mut String) -> Option<u32> {
    let m = RE_NUMBER
        .find_iter(working)
        .find(|m| m.as_str().parse::<u32>().is_ok_and(|n| n > 0))?;
    let guests = m.as_str().parse().ok();
    let span = m.range();
    blank_spans(working, &[span]);
    guests
}

/// Replace each span with spaces of the same length so later spans stay valid
/// and neighbouring tokens stay separated.
fn blank_spans(working: &mut String, spans: &[Range<usize>]) {
    for span in spans.iter().rev() {
        let filler = " ".repeat(span.len());
        working.replace_range(span.clone(), &filler);
    }
}

fn tomorrow(today: NaiveDate) -> String {
    today
        .checked_add_days(Days::new(1))
        .unwrap_or(today)
        .format(DATE_FORMAT)
        .to_string()
}
