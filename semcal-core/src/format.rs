//! German labels for days, times and view titles.

use chrono::{Locale, NaiveDate, NaiveDateTime};

use crate::event::{Event, EventKind, MISSING_ENTRY_SYMBOL};
use crate::window::{Semester, ViewWindow};

const LOCALE: Locale = Locale::de_DE;

pub const TODAY_LABEL: &str = "heute";
pub const NO_EVENTS_DAY: &str = "\u{2014} keine Veranstaltungen \u{2014}";
pub const NO_EVENTS_VIEW: &str = "\u{2014} keine Veranstaltungen eingetragen \u{2014}";
pub const FEED_ERROR: &str = "Fehler beim Laden der Kalender-Quelldateien.";

/// Short weekday with day and month, e.g. "Mo., 10.3.".
pub fn day_label(date: NaiveDate) -> String {
    format!(
        "{}., {}",
        date.format_localized("%a", LOCALE),
        date.format("%-d.%-m.")
    )
}

/// Two-digit clock time, e.g. "09:00".
pub fn time_label(time: NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}

/// Time column of an event row: the start time, or the missing-entry symbol
/// for all-day events.
pub fn start_label(event: &Event) -> String {
    if event.all_day_event {
        MISSING_ENTRY_SYMBOL.to_string()
    } else {
        time_label(event.start_date)
    }
}

/// "Montag, 10. März 2025"
pub fn long_date(date: NaiveDate) -> String {
    date.format_localized("%A, %-d. %B %Y", LOCALE).to_string()
}

/// Heading of the detail view, depending on the kind of event.
pub fn detail_title(event: &Event) -> String {
    match event.kind() {
        EventKind::AllDay => long_date(event.start_date.date()),
        EventKind::MultiDay => format!(
            "{} \u{2013} {}",
            long_date(event.start_date.date()),
            long_date(event.end_date.date())
        ),
        EventKind::Timed => format!(
            "{}, {}\u{2013}{}",
            long_date(event.start_date.date()),
            event.start_date.format("%-H:%M"),
            event.end_date.format("%-H:%M")
        ),
    }
}

/// "Sommersemester 2025" or "Wintersemester 2024/2025".
pub fn semester_title(semester: &Semester) -> String {
    let year = semester.start_year();
    if semester.winter {
        format!("Wintersemester {}/{}", year, year + 1)
    } else {
        format!("Sommersemester {}", year)
    }
}

/// "Woche vom 10.3.2025 bis 16.3.2025"
pub fn week_title(window: &ViewWindow) -> String {
    format!(
        "Woche vom {} bis {}",
        window.first_day().format("%-d.%-m.%Y"),
        window.last_day().format("%-d.%-m.%Y")
    )
}

/// "März 2025"
pub fn month_title(reference: NaiveDate) -> String {
    reference.format_localized("%B %Y", LOCALE).to_string()
}
