//! ICS feed parsing using the icalendar crate's parser.
//!
//! The parser only projects each VEVENT onto the handful of properties the
//! normalizer looks at. Values stay raw where interpreting them can fail, so
//! the normalizer can report exactly what was wrong with a record.

use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use icalendar::parser::{Component, Property, read_calendar, unfold};
use tracing::debug;

use crate::error::{SemcalError, SemcalResult};
use crate::ics::text::unescape_text;

/// A DTSTART/DTEND value as written in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDate {
    pub value: String,
    pub tzid: Option<String>,
    /// `VALUE=DATE` was given
    pub is_date: bool,
}

/// One VEVENT with the properties semcal cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCalendarRecord {
    pub dtstart: Option<RawDate>,
    pub dtend: Option<RawDate>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// One entry per CATEGORIES property, still comma-separated and escaped
    pub categories: Vec<String>,
    pub rrule: Option<String>,
}

/// Parse an iCalendar document into raw event records, in feed order.
pub fn parse_calendar(content: &str) -> SemcalResult<Vec<RawCalendarRecord>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(SemcalError::IcsParse)?;

    let mut records = Vec::new();
    for component in &calendar.components {
        collect_events(component, &mut records);
    }

    debug!(count = records.len(), "parsed VEVENT records");
    Ok(records)
}

/// VEVENTs may sit at the top level or inside a VCALENDAR wrapper.
fn collect_events(component: &Component, records: &mut Vec<RawCalendarRecord>) {
    if component.name == "VEVENT" {
        records.push(to_record(component));
        return;
    }
    for child in &component.components {
        collect_events(child, records);
    }
}

fn to_record(vevent: &Component) -> RawCalendarRecord {
    let text = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| unescape_text(p.val.as_ref()))
    };

    RawCalendarRecord {
        dtstart: vevent.find_prop("DTSTART").map(to_raw_date),
        dtend: vevent.find_prop("DTEND").map(to_raw_date),
        summary: text("SUMMARY"),
        description: text("DESCRIPTION"),
        location: text("LOCATION"),
        categories: vevent
            .properties
            .iter()
            .filter(|p| p.name == "CATEGORIES")
            .map(|p| p.val.to_string())
            .collect(),
        rrule: vevent.find_prop("RRULE").map(|p| p.val.to_string()),
    }
}

fn to_raw_date(prop: &Property) -> RawDate {
    let tzid = prop
        .params
        .iter()
        .find(|p| p.key == "TZID")
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()));

    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"));

    RawDate {
        value: prop.val.as_ref().trim().to_string(),
        tzid,
        is_date,
    }
}

impl RawDate {
    /// Convert to wall-clock time in the display timezone.
    ///
    /// Handles:
    /// - dates: `20250310` (with or without `VALUE=DATE`), midnight
    /// - UTC: `20250310T090000Z`
    /// - zoned: `TZID=Europe/Berlin:20250310T090000`
    /// - floating: `20250310T090000`, taken as display time
    pub fn resolve(&self, display: Tz) -> Result<NaiveDateTime, String> {
        let value = self.value.as_str();

        if self.is_date || (value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit())) {
            return NaiveDate::parse_from_str(value, "%Y%m%d")
                .map(crate::window::start_of_day)
                .map_err(|e| format!("invalid date '{value}': {e}"));
        }

        if let Some(utc) = value.strip_suffix('Z') {
            let naive = parse_date_time(utc)?;
            return Ok(naive.and_utc().with_timezone(&display).naive_local());
        }

        let naive = parse_date_time(value)?;
        let Some(tzid) = &self.tzid else {
            return Ok(naive);
        };

        match tzid.parse::<Tz>() {
            Ok(source) => source
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&display).naive_local())
                .ok_or_else(|| format!("'{value}' does not exist in timezone {tzid}")),
            Err(_) => {
                debug!(tzid = %tzid, "unknown TZID, treating time as floating");
                Ok(naive)
            }
        }
    }
}

fn parse_date_time(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .map_err(|e| format!("invalid date-time '{value}': {e}"))
}
