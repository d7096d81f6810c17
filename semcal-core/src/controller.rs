//! Session state and the commands that change it.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::event::Event;
use crate::selection::{CategoryRule, CategorySelection};
use crate::view::{self, CategoryGate, RenderedView};
use crate::window::{Layout, ViewMode};

/// Source of the current wall-clock time in the display timezone.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    pub timezone: Tz,
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

/// Everything a view depends on.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub today: NaiveDateTime,
    pub reference_date: NaiveDateTime,
    pub mode: ViewMode,
    pub events: Vec<Event>,
    pub selection: CategorySelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    ToggleCategory { category: String },
    Navigate { steps: i32 },
    JumpToToday,
    SetMode { mode: ViewMode },
    ToggleMode,
}

/// Owns the session state and renders it.
///
/// Events are prepared for one layout, so a controller stays within it:
/// a semester controller never switches to a grid mode and vice versa.
#[derive(Debug, Clone)]
pub struct Controller {
    state: SessionState,
    rule: CategoryRule,
}

impl Controller {
    pub fn new(
        mode: ViewMode,
        events: Vec<Event>,
        selection: CategorySelection,
        now: NaiveDateTime,
        rule: CategoryRule,
    ) -> Self {
        Controller {
            state: SessionState {
                today: now,
                reference_date: now,
                mode,
                events,
                selection,
            },
            rule,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> ViewMode {
        self.state.mode
    }

    pub fn today(&self) -> NaiveDate {
        self.state.today.date()
    }

    pub fn events(&self) -> &[Event] {
        &self.state.events
    }

    pub fn event(&self, index: usize) -> Option<&Event> {
        self.state.events.get(index)
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.state.selection
    }

    /// The selection and grid mode as a query string.
    pub fn query(&self) -> String {
        self.state.selection.to_query(self.state.mode)
    }

    /// Replace the selection, e.g. from a query string. A grid mode carried
    /// along with it is adopted as well.
    pub fn set_selection(&mut self, selection: CategorySelection, mode: Option<ViewMode>) {
        self.state.selection = selection;
        if let Some(mode) = mode {
            self.set_mode(mode);
        }
    }

    pub fn apply(&mut self, command: Command) -> RenderedView<'_> {
        debug!(?command, "applying command");
        match command {
            Command::ToggleCategory { category } => {
                if !self.state.selection.known().contains(&category) {
                    warn!(%category, "ignoring toggle of unknown category");
                }
                self.state.selection.toggle(&category);
            }
            Command::Navigate { steps } => {
                self.state.reference_date = self.state.mode.shift(self.state.reference_date, steps);
            }
            Command::JumpToToday => self.jump_to(self.state.today),
            Command::SetMode { mode } => self.set_mode(mode),
            Command::ToggleMode => {
                let next = match self.state.mode {
                    ViewMode::Week => ViewMode::Month,
                    ViewMode::Month => ViewMode::Week,
                    ViewMode::Semester => ViewMode::Semester,
                };
                self.set_mode(next);
            }
        }
        self.render()
    }

    /// Render the current state. Grid modes apply the category selection;
    /// the semester list was filtered when its events were normalized.
    pub fn render(&self) -> RenderedView<'_> {
        let gate = match self.state.mode.layout() {
            Layout::Grid => Some(CategoryGate {
                selection: &self.state.selection,
                rule: self.rule,
            }),
            Layout::List => None,
        };
        view::render(
            self.state.mode,
            self.state.reference_date.date(),
            self.state.today.date(),
            &self.state.events,
            gate,
        )
    }

    /// Show the view around `date`; today stays as it is.
    pub fn go_to(&mut self, date: NaiveDate) {
        self.state.reference_date = date.and_time(self.state.today.time());
    }

    /// React to the clock. On a new date both today and the reference date
    /// move to `now`; returns whether the view needs to be redrawn.
    pub fn on_tick(&mut self, now: NaiveDateTime) -> bool {
        if now.date() == self.state.today.date() {
            self.state.today = now;
            return false;
        }
        info!(from = %self.state.today.date(), to = %now.date(), "date changed");
        self.jump_to(now);
        true
    }

    /// Swap in a freshly loaded event list.
    pub fn replace_events(&mut self, events: Vec<Event>) {
        debug!(count = events.len(), "replacing events");
        self.state.events = events;
    }

    fn jump_to(&mut self, now: NaiveDateTime) {
        self.state.today = now;
        self.state.reference_date = now;
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if mode.layout() != self.state.mode.layout() {
            warn!(from = ?self.state.mode, to = ?mode, "view mode belongs to another layout");
            return;
        }
        self.state.mode = mode;
    }
}
