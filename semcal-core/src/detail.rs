use serde::Serialize;

use crate::event::Event;
use crate::format;

/// A category as shown in the detail view. Categories that are not
/// configured are shown without a color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChip {
    pub name: String,
    pub known: bool,
}

/// Everything the detail view of a single event shows.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub title: String,
    pub summary: String,
    pub location_label: String,
    pub categories: Vec<CategoryChip>,
    pub description_lines: Vec<String>,
}

impl EventDetail {
    pub fn new(event: &Event, known: &[String]) -> Self {
        EventDetail {
            title: format::detail_title(event),
            summary: event.summary.clone(),
            location_label: event.location.label().to_string(),
            categories: event
                .all_categories
                .iter()
                .map(|name| CategoryChip {
                    name: name.clone(),
                    known: known.contains(name),
                })
                .collect(),
            description_lines: event.description.lines().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Location;
    use chrono::NaiveDate;

    #[test]
    fn detail_marks_unknown_categories_and_splits_description() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(14, 15, 0)
            .unwrap();
        let event = Event {
            summary: "Oberseminar".into(),
            description: "Vortrag\nim Anschluss Kaffee".into(),
            location: Location::Unknown,
            start_date: start,
            end_date: start + chrono::Duration::minutes(90),
            all_day_event: false,
            single_day_event: false,
            main_category: "Algebra".into(),
            all_categories: vec!["Algebra".into(), "Gast".into()],
        };

        let detail = EventDetail::new(&event, &["Algebra".to_string()]);
        assert_eq!(detail.title, "Montag, 10. März 2025, 14:15\u{2013}15:45");
        assert_eq!(detail.location_label, "Ort unbekannt");
        assert_eq!(
            detail.categories,
            vec![
                CategoryChip {
                    name: "Algebra".into(),
                    known: true
                },
                CategoryChip {
                    name: "Gast".into(),
                    known: false
                },
            ]
        );
        assert_eq!(detail.description_lines, vec!["Vortrag", "im Anschluss Kaffee"]);
    }
}
