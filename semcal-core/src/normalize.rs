//! Turns raw VEVENT records into [`Event`]s.
//!
//! A record either becomes exactly one event or is rejected with a
//! [`Rejection`]. Rejections are logged and dropped by
//! [`Normalizer::normalize_all`]; they never abort a batch.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{debug, warn};

use crate::event::{Event, Location, NO_CATEGORY};
use crate::ics::{RawCalendarRecord, split_text_list};
use crate::window::Layout;

/// Why a record did not become an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(
        "event ignored: it has no start date (DTSTART) or no summary (SUMMARY)"
    )]
    MissingRequired,

    #[error("event '{summary}' ignored: start date could not be converted ({reason})")]
    UnconvertibleStart { summary: String, reason: String },

    #[error("event on {date} entitled '{summary}' ignored: recurring events (RRULE) are not supported")]
    Recurring { summary: String, date: NaiveDate },

    #[error("event on {date} entitled '{summary}' ignored: categories could not be parsed ({reason})")]
    UnparseableCategories {
        summary: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("event on {date} entitled '{summary}' ignored: none of its categories is displayed")]
    NoMatchingCategory { summary: String, date: NaiveDate },
}

/// Classification of an event's time span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub single_day: bool,
}

/// Classify a span from its start and optional end.
///
/// An end at exactly midnight is read as an exclusive bound and moved back
/// one minute, so it lands on the last minute of the previous day.
pub fn classify(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Span {
    let Some(mut end) = end else {
        return Span {
            start,
            end: start,
            all_day: true,
            single_day: true,
        };
    };

    if is_hour_minute(end, 0, 0) {
        end -= Duration::minutes(1);
    }

    let same_day = start.date() == end.date();
    let (all_day, single_day) = if same_day && is_hour_minute(start, 0, 0) && is_hour_minute(end, 23, 59) {
        (true, true)
    } else if !same_day {
        (true, false)
    } else {
        (false, false)
    };

    Span {
        start,
        end,
        all_day,
        single_day,
    }
}

fn is_hour_minute(time: NaiveDateTime, hour: u32, minute: u32) -> bool {
    time.hour() == hour && time.minute() == minute
}

/// Trim each category and collapse runs of spaces.
fn clean_category(raw: &str) -> String {
    raw.trim()
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts records for one layout.
///
/// With a considered set (the semester list), records whose categories all
/// lie outside the set are rejected up front.
#[derive(Debug, Clone)]
pub struct Normalizer {
    timezone: Tz,
    layout: Layout,
    considered: Option<HashSet<String>>,
}

impl Normalizer {
    /// Semester list: only events in one of `categories` are kept.
    pub fn list(timezone: Tz, categories: &[String]) -> Self {
        Normalizer {
            timezone,
            layout: Layout::List,
            considered: Some(categories.iter().cloned().collect()),
        }
    }

    /// Week/month grid fed by one feed per category.
    pub fn grid(timezone: Tz) -> Self {
        Normalizer {
            timezone,
            layout: Layout::Grid,
            considered: None,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Normalize one record.
    ///
    /// With a `source_category` (merged feeds) that category leads the list
    /// and becomes the main category. Without one, the first CATEGORIES
    /// value is the main category, or [`NO_CATEGORY`] if there is none.
    pub fn normalize(
        &self,
        record: &RawCalendarRecord,
        source_category: Option<&str>,
    ) -> Result<Event, Rejection> {
        let (Some(raw_start), Some(summary)) = (&record.dtstart, &record.summary) else {
            return Err(Rejection::MissingRequired);
        };
        let summary = summary.clone();

        let start = raw_start
            .resolve(self.timezone)
            .map_err(|reason| Rejection::UnconvertibleStart {
                summary: summary.clone(),
                reason,
            })?;

        if record.rrule.is_some() {
            return Err(Rejection::Recurring {
                summary,
                date: start.date(),
            });
        }

        let mut categories: Vec<String> = source_category.map(str::to_string).into_iter().collect();
        for raw in &record.categories {
            let values = split_text_list(raw).map_err(|e| Rejection::UnparseableCategories {
                summary: summary.clone(),
                date: start.date(),
                reason: e.to_string(),
            })?;
            categories.extend(values);
        }
        // A set in first-seen order; blank values carry no category
        let mut seen = HashSet::new();
        let mut categories: Vec<String> = categories
            .iter()
            .map(|c| clean_category(c))
            .filter(|c| !c.is_empty() && seen.insert(c.clone()))
            .collect();
        if categories.is_empty() {
            categories.push(NO_CATEGORY.to_string());
        }
        let main_category = categories[0].clone();

        if let Some(considered) = &self.considered {
            if !categories.iter().any(|c| considered.contains(c)) {
                return Err(Rejection::NoMatchingCategory {
                    summary,
                    date: start.date(),
                });
            }
        }

        // A DTEND that cannot be read counts as absent
        let end = record.dtend.as_ref().and_then(|raw| match raw.resolve(self.timezone) {
            Ok(end) => Some(end),
            Err(reason) => {
                debug!(summary = %summary, %reason, "ignoring unreadable DTEND");
                None
            }
        });

        let span = classify(start, end);
        let mut start_date = span.start;
        let mut end_date = span.end;
        if span.all_day {
            start_date = self.layout.all_day_anchor(start_date.date());
        }
        // Keeps start <= end for pinned anchors and for ends before starts
        end_date = end_date.max(start_date);

        Ok(Event {
            summary,
            description: record.description.clone().unwrap_or_default(),
            location: Location::from_optional(record.location.clone()),
            start_date,
            end_date,
            all_day_event: span.all_day,
            single_day_event: span.single_day,
            main_category,
            all_categories: categories,
        })
    }

    /// Normalize a whole feed, logging and dropping rejected records.
    pub fn normalize_all(
        &self,
        records: &[RawCalendarRecord],
        source_category: Option<&str>,
    ) -> Vec<Event> {
        let mut rejected = 0usize;
        let events: Vec<Event> = records
            .iter()
            .filter_map(|record| match self.normalize(record, source_category) {
                Ok(event) => Some(event),
                Err(rejection) => {
                    rejected += 1;
                    match rejection {
                        // Expected whenever a shared feed carries other groups' events
                        Rejection::NoMatchingCategory { .. } => debug!("{rejection}"),
                        _ => warn!("{rejection}"),
                    }
                    None
                }
            })
            .collect();

        debug!(
            category = source_category.unwrap_or("-"),
            accepted = events.len(),
            rejected,
            "normalized feed"
        );
        events
    }
}
