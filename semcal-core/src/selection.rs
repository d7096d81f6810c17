//! Which categories are currently shown, and how that choice is kept in a
//! URL query string.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::event::Event;
use crate::window::ViewMode;

/// Query parameter that switches the grid to month view.
pub const WEEKVIEW_PARAM: &str = "weekview";

/// How an event's categories are matched against the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryRule {
    /// Only the main category counts.
    #[default]
    Strict,
    /// Any of the event's categories counts.
    CrossListing,
}

/// The active subset of the known categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    known: Vec<String>,
    active: BTreeSet<String>,
}

impl CategorySelection {
    /// Everything selected.
    pub fn all(known: &[String]) -> Self {
        CategorySelection {
            known: known.to_vec(),
            active: known.iter().cloned().collect(),
        }
    }

    /// Restore a selection and grid mode from a query string.
    ///
    /// If any known category is set to `0`, categories not mentioned are
    /// included; otherwise only those mentioned with a value other than `0`
    /// are. An empty result selects everything.
    pub fn from_query(query: &str, known: &[String]) -> (Self, ViewMode) {
        // First occurrence wins, like URLSearchParams.get
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }

        let mode = if params.get(WEEKVIEW_PARAM).map(String::as_str) == Some("0") {
            ViewMode::Month
        } else {
            ViewMode::Week
        };

        let excluding = known
            .iter()
            .any(|c| params.get(c).map(String::as_str) == Some("0"));

        let active: BTreeSet<String> = known
            .iter()
            .filter(|c| match params.get(*c) {
                Some(value) => value != "0",
                None => excluding,
            })
            .cloned()
            .collect();

        let selection = if active.is_empty() {
            Self::all(known)
        } else {
            CategorySelection {
                known: known.to_vec(),
                active,
            }
        };
        (selection, mode)
    }

    /// Encode as the shorter of an inclusion or exclusion list.
    ///
    /// Returns an empty string when everything is selected and the mode is
    /// the default week view.
    pub fn to_query(&self, mode: ViewMode) -> String {
        let (excluded, included): (Vec<&String>, Vec<&String>) =
            self.known.iter().partition(|c| !self.active.contains(*c));

        let (listed, bit) = if excluded.len() < included.len() {
            (excluded, "0")
        } else {
            (included, "1")
        };

        let mut query = form_urlencoded::Serializer::new(String::new());
        for category in listed {
            query.append_pair(category, bit);
        }
        if mode == ViewMode::Month {
            query.append_pair(WEEKVIEW_PARAM, "0");
        }
        query.finish()
    }

    /// Flip a category on or off. Returns whether it is now active; unknown
    /// categories are left alone.
    pub fn toggle(&mut self, category: &str) -> bool {
        if !self.known.iter().any(|c| c == category) {
            return false;
        }
        if !self.active.remove(category) {
            self.active.insert(category.to_string());
            return true;
        }
        false
    }

    pub fn is_active(&self, category: &str) -> bool {
        self.active.contains(category)
    }

    pub fn is_all(&self) -> bool {
        self.known.iter().all(|c| self.active.contains(c))
    }

    /// Known categories, in configured order.
    pub fn known(&self) -> &[String] {
        &self.known
    }

    /// Active categories, in configured order.
    pub fn active(&self) -> impl Iterator<Item = &String> {
        self.known.iter().filter(|c| self.active.contains(*c))
    }

    /// Whether `event` is visible under this selection.
    pub fn admits(&self, event: &Event, rule: CategoryRule) -> bool {
        match rule {
            CategoryRule::Strict => self.is_active(&event.main_category),
            CategoryRule::CrossListing => self.active().any(|c| event.has_category(c)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Location;
    use chrono::NaiveDate;

    fn known() -> Vec<String> {
        ["Algebra", "Analysis", "Topologie", "Didaktik der Mathematik"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn active(selection: &CategorySelection) -> Vec<&str> {
        selection.active().map(String::as_str).collect()
    }

    #[test]
    fn empty_query_selects_everything_in_week_mode() {
        let (selection, mode) = CategorySelection::from_query("", &known());
        assert!(selection.is_all());
        assert_eq!(mode, ViewMode::Week);
    }

    #[test]
    fn inclusion_query_selects_only_named_categories() {
        let (selection, _) = CategorySelection::from_query("?Algebra=1&Topologie=yes", &known());
        assert_eq!(active(&selection), vec!["Algebra", "Topologie"]);
    }

    #[test]
    fn any_zero_switches_to_exclusion() {
        let (selection, _) = CategorySelection::from_query("Analysis=0&Algebra=1", &known());
        assert_eq!(
            active(&selection),
            vec!["Algebra", "Topologie", "Didaktik der Mathematik"]
        );
    }

    #[test]
    fn excluding_everything_falls_back_to_all() {
        let query = "Algebra=0&Analysis=0&Topologie=0&Didaktik+der+Mathematik=0";
        let (selection, _) = CategorySelection::from_query(query, &known());
        assert!(selection.is_all());
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let (selection, _) = CategorySelection::from_query("Numerik=0&Zahlentheorie=1", &known());
        assert!(selection.is_all());
    }

    #[test]
    fn weekview_zero_selects_month_mode() {
        let (_, mode) = CategorySelection::from_query("weekview=0", &known());
        assert_eq!(mode, ViewMode::Month);
        let (_, mode) = CategorySelection::from_query("weekview=1", &known());
        assert_eq!(mode, ViewMode::Week);
    }

    #[test]
    fn full_selection_serializes_to_nothing() {
        let selection = CategorySelection::all(&known());
        assert_eq!(selection.to_query(ViewMode::Week), "");
        assert_eq!(selection.to_query(ViewMode::Month), "weekview=0");
    }

    #[test]
    fn serialization_picks_the_shorter_list() {
        let mut selection = CategorySelection::all(&known());
        selection.toggle("Analysis");
        assert_eq!(selection.to_query(ViewMode::Week), "Analysis=0");

        selection.toggle("Algebra");
        selection.toggle("Topologie");
        assert_eq!(
            selection.to_query(ViewMode::Week),
            "Didaktik+der+Mathematik=1"
        );

        // Ties use the inclusion list
        selection.toggle("Algebra");
        assert_eq!(
            selection.to_query(ViewMode::Month),
            "Algebra=1&Didaktik+der+Mathematik=1&weekview=0"
        );
    }

    #[test]
    fn query_round_trip_restores_every_non_empty_subset() {
        let known = known();
        for mask in 1u32..(1 << known.len()) {
            let mut selection = CategorySelection::all(&known);
            for (i, category) in known.iter().enumerate() {
                if mask & (1 << i) == 0 {
                    selection.toggle(category);
                }
            }
            for mode in [ViewMode::Week, ViewMode::Month] {
                let query = selection.to_query(mode);
                let (restored, restored_mode) = CategorySelection::from_query(&query, &known);
                assert_eq!(restored, selection, "query {query:?}");
                assert_eq!(restored_mode, mode);
            }
        }
    }

    #[test]
    fn toggle_flips_and_ignores_unknown() {
        let mut selection = CategorySelection::all(&known());
        assert!(!selection.toggle("Algebra"));
        assert!(!selection.is_active("Algebra"));
        assert!(selection.toggle("Algebra"));
        assert!(selection.is_active("Algebra"));

        assert!(!selection.toggle("Numerik"));
        assert!(selection.is_all());
    }

    #[test]
    fn strict_rule_only_looks_at_main_category() {
        let event = Event {
            summary: "Gemeinsames Kolloquium".into(),
            description: String::new(),
            location: Location::Unknown,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(16, 0, 0)
                .unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap(),
            all_day_event: false,
            single_day_event: false,
            main_category: "Algebra".into(),
            all_categories: vec!["Algebra".into(), "Topologie".into()],
        };

        let mut selection = CategorySelection::all(&known());
        selection.toggle("Algebra");

        assert!(!selection.admits(&event, CategoryRule::Strict));
        assert!(selection.admits(&event, CategoryRule::CrossListing));
    }
}
