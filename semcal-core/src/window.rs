//! Display windows for the semester, week and month views.
//!
//! All functions are pure: a window is derived from a reference date and
//! recomputed on every render.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Midnight at the start of `day`.
pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::default())
}

/// Last representable millisecond of `day`.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is a valid time")
}

/// Which family of views an event list is prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Semester list: one row per event.
    List,
    /// Week and month grids.
    Grid,
}

impl Layout {
    /// Where the start of an all-day event is pinned for sorting.
    ///
    /// The list view puts all-day events behind timed events of the same day,
    /// the grids put them in front.
    pub fn all_day_anchor(self, day: NaiveDate) -> NaiveDateTime {
        match self {
            Layout::List => end_of_day(day),
            Layout::Grid => start_of_day(day),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Semester,
    Week,
    Month,
}

impl ViewMode {
    pub fn layout(self) -> Layout {
        match self {
            ViewMode::Semester => Layout::List,
            ViewMode::Week | ViewMode::Month => Layout::Grid,
        }
    }

    pub fn window(self, reference: NaiveDate) -> ViewWindow {
        match self {
            ViewMode::Semester => Semester::containing(reference).window,
            ViewMode::Week => week_window(reference),
            ViewMode::Month => month_window(reference),
        }
    }

    /// Move the reference date by `steps` terms, weeks or months.
    pub fn shift(self, reference: NaiveDateTime, steps: i32) -> NaiveDateTime {
        match self {
            ViewMode::Semester => shift_months(reference, steps.saturating_mul(6)),
            ViewMode::Week => TimeDelta::try_weeks(i64::from(steps))
                .and_then(|delta| reference.checked_add_signed(delta))
                .unwrap_or(reference),
            ViewMode::Month => shift_months(reference, steps),
        }
    }
}

/// First and last displayed instant of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewWindow {
    pub first_day_displayed: NaiveDateTime,
    pub last_day_displayed: NaiveDateTime,
}

impl ViewWindow {
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Self {
        ViewWindow {
            first_day_displayed: start_of_day(first),
            last_day_displayed: end_of_day(last),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day_displayed.date()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day_displayed.date()
    }

    /// Every day of the window, earliest first.
    pub fn days(&self) -> Vec<NaiveDate> {
        let first = self.first_day();
        let count = (self.last_day() - first).num_days() + 1;
        (0..count).map(|offset| first + Duration::days(offset)).collect()
    }
}

/// A six month academic term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    pub window: ViewWindow,
    /// October to March; April to September is the summer term.
    pub winter: bool,
}

impl Semester {
    pub fn containing(reference: NaiveDate) -> Self {
        let month0 = reference.month0();
        let offset = (month0 + 3) % 6;
        // Terms at the edges of chrono's date range are cut off there
        let first = NaiveDate::from_ymd_opt(reference.year(), month0 + 1, 1)
            .and_then(|d| d.checked_sub_months(Months::new(offset)))
            .unwrap_or(NaiveDate::MIN);
        let last = first
            .checked_add_months(Months::new(6))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX);

        Semester {
            window: ViewWindow::from_days(first, last),
            winter: first.month() != 4,
        }
    }

    /// Calendar year in which the term starts.
    pub fn start_year(&self) -> i32 {
        self.window.first_day().year()
    }
}

/// Monday through Sunday of the week containing `reference`.
pub fn week_window(reference: NaiveDate) -> ViewWindow {
    let offset = i64::from(reference.weekday().num_days_from_monday());
    let first = add_days(reference, -offset);
    ViewWindow::from_days(first, add_days(first, 6))
}

/// The month of `reference`, padded to whole Sunday-to-Saturday weeks.
pub fn month_window(reference: NaiveDate) -> ViewWindow {
    let first_of_month = reference.with_day(1).unwrap_or(reference);
    let last_of_month = first_of_month
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(reference);

    let lead = i64::from(first_of_month.weekday().num_days_from_sunday());
    let trail = 6 - i64::from(last_of_month.weekday().num_days_from_sunday());

    ViewWindow::from_days(
        add_days(first_of_month, -lead),
        add_days(last_of_month, trail),
    )
}

/// `day` moved by `days`, saturating at chrono's first and last date.
fn add_days(day: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| day.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Shift by whole months, clamping the day to the target month's length.
pub fn shift_months(date: NaiveDateTime, months: i32) -> NaiveDateTime {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summer_term_runs_april_to_september() {
        let term = Semester::containing(date(2025, 5, 15));
        assert_eq!(term.window.first_day(), date(2025, 4, 1));
        assert_eq!(term.window.last_day(), date(2025, 9, 30));
        assert!(!term.winter);
    }

    #[test]
    fn winter_term_spans_new_year() {
        let term = Semester::containing(date(2025, 1, 15));
        assert_eq!(term.window.first_day(), date(2024, 10, 1));
        assert_eq!(term.window.last_day(), date(2025, 3, 31));
        assert!(term.winter);
        assert_eq!(term.start_year(), 2024);
    }

    #[test]
    fn term_boundaries_belong_to_their_own_term() {
        assert_eq!(
            Semester::containing(date(2025, 3, 31)).window.first_day(),
            date(2024, 10, 1)
        );
        assert_eq!(
            Semester::containing(date(2025, 4, 1)).window.first_day(),
            date(2025, 4, 1)
        );
        assert_eq!(
            Semester::containing(date(2025, 10, 1)).window.last_day(),
            date(2026, 3, 31)
        );
        // Last day of a month whose target start month is shorter
        assert_eq!(
            Semester::containing(date(2025, 5, 31)).window.first_day(),
            date(2025, 4, 1)
        );
    }

    #[test]
    fn window_bounds_are_pinned_to_day_edges() {
        let window = week_window(date(2025, 3, 12));
        assert_eq!(window.first_day_displayed, start_of_day(date(2025, 3, 10)));
        assert_eq!(
            window.last_day_displayed.time(),
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        let wednesday = week_window(date(2025, 3, 12));
        assert_eq!(wednesday.first_day(), date(2025, 3, 10));
        assert_eq!(wednesday.last_day(), date(2025, 3, 16));

        // A Sunday closes the week that began on the previous Monday
        let sunday = week_window(date(2025, 3, 16));
        assert_eq!(sunday.first_day(), date(2025, 3, 10));

        let monday = week_window(date(2025, 3, 10));
        assert_eq!(monday.first_day(), date(2025, 3, 10));
        assert_eq!(monday.days().len(), 7);
    }

    #[test]
    fn month_is_padded_to_full_weeks() {
        // March 2025 starts on a Saturday and ends on a Monday
        let window = month_window(date(2025, 3, 20));
        assert_eq!(window.first_day(), date(2025, 2, 23));
        assert_eq!(window.last_day(), date(2025, 4, 5));
        assert_eq!(window.days().len() % 7, 0);

        // June 2025 starts on a Sunday and ends on a Monday
        let june = month_window(date(2025, 6, 1));
        assert_eq!(june.first_day(), date(2025, 6, 1));
        assert_eq!(june.last_day(), date(2025, 7, 5));
    }

    #[test]
    fn navigation_shifts_by_mode_unit() {
        let reference = start_of_day(date(2025, 1, 31));

        assert_eq!(
            ViewMode::Semester.shift(reference, 1).date(),
            date(2025, 7, 31)
        );
        assert_eq!(
            ViewMode::Semester.shift(reference, -1).date(),
            date(2024, 7, 31)
        );
        assert_eq!(ViewMode::Week.shift(reference, 2).date(), date(2025, 2, 14));
        // Clamped to the end of February
        assert_eq!(ViewMode::Month.shift(reference, 1).date(), date(2025, 2, 28));
        assert_eq!(ViewMode::Month.shift(reference, -2).date(), date(2024, 11, 30));
    }

    #[test]
    fn huge_shifts_stay_in_range() {
        let reference = start_of_day(date(2025, 3, 12));
        assert_eq!(ViewMode::Week.shift(reference, 1_000_000_000), reference);
        assert_eq!(ViewMode::Week.shift(reference, i32::MIN), reference);
        assert_eq!(ViewMode::Month.shift(reference, i32::MAX), reference);
        assert_eq!(ViewMode::Semester.shift(reference, i32::MIN), reference);
    }

    #[test]
    fn windows_at_the_end_of_time_are_clamped() {
        let last = NaiveDate::MAX;
        let week = week_window(last);
        assert!(week.first_day() <= last);
        assert_eq!(week.last_day(), last);

        let month = month_window(last);
        assert_eq!(month.last_day(), last);

        let term = Semester::containing(last);
        assert_eq!(term.window.last_day(), last);

        let first = week_window(NaiveDate::MIN);
        assert_eq!(first.first_day(), NaiveDate::MIN);
    }

    #[test]
    fn layouts_anchor_all_day_events_at_opposite_day_edges() {
        let day = date(2025, 3, 10);
        assert_eq!(Layout::Grid.all_day_anchor(day), start_of_day(day));
        assert_eq!(Layout::List.all_day_anchor(day), end_of_day(day));
        assert_eq!(ViewMode::Semester.layout(), Layout::List);
        assert_eq!(ViewMode::Month.layout(), Layout::Grid);
    }
}
