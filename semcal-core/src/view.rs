//! Groups events into the days of a view window.
//!
//! The output is a plain data structure; turning it into table rows or grid
//! cells is left to the caller.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::event::Event;
use crate::format;
use crate::selection::{CategoryRule, CategorySelection};
use crate::window::{Semester, ViewMode, ViewWindow};

/// A day's position relative to today, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPhase {
    Past,
    Today,
    Future,
}

impl DayPhase {
    pub fn of(day: NaiveDate, today: NaiveDate) -> Self {
        match day.cmp(&today) {
            std::cmp::Ordering::Less => DayPhase::Past,
            std::cmp::Ordering::Equal => DayPhase::Today,
            std::cmp::Ordering::Greater => DayPhase::Future,
        }
    }
}

/// An event placed on a day, with its position in the full event list.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EventRef<'a> {
    pub id: usize,
    #[serde(flatten)]
    pub event: &'a Event,
}

/// One day of a view and the events shown on it.
#[derive(Debug, Clone, Serialize)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub label: String,
    pub phase: DayPhase,
    /// False for the padding days of a month grid
    pub in_month: bool,
    pub weekend: bool,
    pub events: Vec<EventRef<'a>>,
}

/// Everything needed to draw one view.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedView<'a> {
    pub mode: ViewMode,
    pub title: String,
    pub window: ViewWindow,
    pub days: Vec<DayGroup<'a>>,
}

impl RenderedView<'_> {
    /// No event at all in the window.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|d| d.events.is_empty())
    }

    /// Distinct events in the window; multi-day events count once.
    pub fn event_count(&self) -> usize {
        let mut ids: Vec<usize> = self
            .days
            .iter()
            .flat_map(|d| d.events.iter().map(|e| e.id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

/// Which events pass the category gate. The semester list has already been
/// filtered by the normalizer, so it passes `None`.
#[derive(Debug, Clone, Copy)]
pub struct CategoryGate<'s> {
    pub selection: &'s CategorySelection,
    pub rule: CategoryRule,
}

/// Events overlapping `window` that pass the gate, in feed order.
pub fn prefilter<'a>(
    window: &ViewWindow,
    events: &'a [Event],
    gate: Option<CategoryGate<'_>>,
) -> Vec<EventRef<'a>> {
    events
        .iter()
        .enumerate()
        .filter(|(_, event)| event.overlaps(window))
        .filter(|(_, event)| gate.is_none_or(|g| g.selection.admits(event, g.rule)))
        .map(|(id, event)| EventRef { id, event })
        .collect()
}

/// Events on `day`, earliest start first; ties keep feed order.
pub fn events_on<'a>(candidates: &[EventRef<'a>], day: NaiveDate) -> Vec<EventRef<'a>> {
    let mut day_events: Vec<EventRef<'a>> = candidates
        .iter()
        .filter(|r| r.event.occurs_on(day))
        .copied()
        .collect();
    day_events.sort_by_key(|r| r.event.start_date);
    day_events
}

/// Build the view for `mode` around `reference`.
///
/// Semester days run latest first, the way the list is read; week and month
/// days run earliest first.
pub fn render<'a>(
    mode: ViewMode,
    reference: NaiveDate,
    today: NaiveDate,
    events: &'a [Event],
    gate: Option<CategoryGate<'_>>,
) -> RenderedView<'a> {
    let window = mode.window(reference);
    let candidates = prefilter(&window, events, gate);

    let mut days: Vec<DayGroup<'a>> = window
        .days()
        .into_iter()
        .map(|date| DayGroup {
            date,
            label: format::day_label(date),
            phase: DayPhase::of(date, today),
            in_month: mode != ViewMode::Month || date.month() == reference.month(),
            weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            events: events_on(&candidates, date),
        })
        .collect();

    if mode == ViewMode::Semester {
        days.reverse();
    }

    let title = match mode {
        ViewMode::Semester => format::semester_title(&Semester::containing(reference)),
        ViewMode::Week => format::week_title(&window),
        ViewMode::Month => format::month_title(reference),
    };

    debug!(
        ?mode,
        %reference,
        candidates = candidates.len(),
        "rendered view"
    );

    RenderedView {
        mode,
        title,
        window,
        days,
    }
}
