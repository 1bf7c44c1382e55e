//! Text formatting for the terminal front-end.

use chrono::{DateTime, Local, TimeZone, Utc};
use quiz_core::model::HistoryRecord;
use services::{ClearReport, SessionView};

/// Locale-style calendar date (`MM/DD/YYYY`) in the given zone.
#[must_use]
pub fn format_date_in<Tz: TimeZone>(value: DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value.with_timezone(zone).format("%m/%d/%Y").to_string()
}

#[must_use]
pub fn history_line_in<Tz: TimeZone>(record: &HistoryRecord, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}/{} ({}%) on {}",
        record.score(),
        record.total_questions(),
        record.percentage(),
        format_date_in(record.completed_at(), zone)
    )
}

#[must_use]
pub fn render_history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "Quiz History\n  No history yet".to_owned();
    }
    let mut out = String::from("Quiz History");
    for record in records {
        out.push_str("\n  ");
        out.push_str(&history_line_in(record, &Local));
    }
    out
}

/// Outcome line for a history clear. A store failure is only a warning.
#[must_use]
pub fn clear_message(report: &ClearReport) -> String {
    match &report.store_error {
        None => "Quiz history cleared!".to_owned(),
        Some(err) => format!(
            "Quiz history cleared. Warning: the saved copy could not be removed and may reappear after a restart ({err})."
        ),
    }
}

#[must_use]
pub fn render_view(view: &SessionView) -> String {
    match view {
        SessionView::Loading => "Loading…".to_owned(),
        SessionView::Empty => "No questions available".to_owned(),
        SessionView::Question(q) => {
            let mut out = format!("Question {} of {}  (score {})\n{}", q.number, q.total, q.score, q.prompt);
            for (i, option) in q.options.iter().enumerate() {
                let marker = if q.selected == Some(i) { "x" } else { " " };
                out.push_str(&format!("\n  [{marker}] {}. {option}", i + 1));
            }
            let action = if q.is_last { "Finish Quiz" } else { "Next Question" };
            out.push_str(&format!("\n  n) {action}"));
            out
        }
        SessionView::Completed(result) => format!(
            "Quiz Complete!\nScore: {}/{}\n{}%",
            result.score, result.total, result.percentage
        ),
    }
}
