//! Core of the semcal calendar views.
//!
//! This crate turns iCalendar feeds into the data behind the views:
//! - `ics` and `normalize` map VEVENT records to [`Event`]s
//! - `window` computes the semester, week and month windows
//! - `selection` keeps the active categories and their query string
//! - `view` groups events into days
//! - `controller` and `rollover` drive navigation and the date change

pub mod config;
pub mod controller;
pub mod detail;
pub mod error;
pub mod event;
pub mod feed;
pub mod format;
pub mod ics;
pub mod normalize;
pub mod rollover;
pub mod selection;
pub mod view;
pub mod window;

pub use config::SemcalConfig;
pub use controller::{Clock, Command, Controller, SessionState, SystemClock};
pub use detail::{CategoryChip, EventDetail};
pub use error::{SemcalError, SemcalResult};
pub use event::{Event, EventKind, Location};
pub use feed::{FeedFailure, FeedLoad, FeedLoader, FeedSource};
pub use normalize::{Normalizer, Rejection};
pub use rollover::RolloverWatch;
pub use selection::{CategoryRule, CategorySelection};
pub use view::{DayGroup, DayPhase, EventRef, RenderedView};
pub use window::{Layout, Semester, ViewMode, ViewWindow};
