//! Canonical display model for calendar events.
//!
//! Feeds are parsed into raw records (see [`crate::ics`]) and then normalized
//! into [`Event`]s. Everything downstream (windows, grouping, presentation)
//! works exclusively with this type.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::window::ViewWindow;

/// Shown wherever a field has no value (location, time of an all-day event).
pub const MISSING_ENTRY_SYMBOL: &str = "\u{2022}";

/// Category assigned to list-view events that carry no CATEGORIES property.
pub const NO_CATEGORY: &str = "none";

/// Where an event takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Location {
    Known(String),
    Unknown,
}

impl Location {
    /// Empty strings count as missing, like an absent LOCATION property.
    pub fn from_optional(location: Option<String>) -> Self {
        match location {
            Some(name) if !name.is_empty() => Location::Known(name),
            _ => Location::Unknown,
        }
    }

    /// Text for table cells: the name, or the missing-entry symbol.
    pub fn display(&self) -> &str {
        match self {
            Location::Known(name) => name,
            Location::Unknown => MISSING_ENTRY_SYMBOL,
        }
    }

    /// Text for the detail view.
    pub fn label(&self) -> &str {
        match self {
            Location::Known(name) => name,
            Location::Unknown => "Ort unbekannt",
        }
    }
}

/// A normalized calendar event.
///
/// `start_date` of an all-day event is pinned to a display anchor (see
/// [`crate::window::Layout::all_day_anchor`]) and only meaningful as a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub summary: String,
    pub description: String,
    pub location: Location,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub all_day_event: bool,
    pub single_day_event: bool,
    pub main_category: String,
    /// Never empty; the main category is always one of them.
    pub all_categories: Vec<String>,
}

/// How an event is presented in the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Has a start and end time on one day.
    Timed,
    /// Covers one whole day.
    AllDay,
    /// Covers several days.
    MultiDay,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match (self.all_day_event, self.single_day_event) {
            (true, true) => EventKind::AllDay,
            (true, false) => EventKind::MultiDay,
            _ => EventKind::Timed,
        }
    }

    /// True if any part of the event lies inside the window.
    pub fn overlaps(&self, window: &ViewWindow) -> bool {
        self.end_date >= window.first_day_displayed && self.start_date <= window.last_day_displayed
    }

    /// True if the event starts on `day` or its span covers the start of `day`.
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        let day_start = crate::window::start_of_day(day);
        self.start_date.date() == day || (day_start >= self.start_date && day_start <= self.end_date)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.all_categories.iter().any(|c| c == category)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}
