use chrono::{NaiveDate, NaiveDateTime};
use semcal_core::ics::parse_calendar;
use semcal_core::{
    CategoryRule, CategorySelection, Command, Controller, DayPhase, Normalizer, ViewMode,
};

const BERLIN: chrono_tz::Tz = chrono_tz::Europe::Berlin;

const SEMESTER_FEED: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
BEGIN:VEVENT\r
SUMMARY:Vorlesungsbeginn\r
DTSTART;VALUE=DATE:20250414\r
CATEGORIES:Algebra,Analysis\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Kolloquium\r
DTSTART;TZID=Europe/Berlin:20250414T161500\r
DTEND;TZID=Europe/Berlin:20250414T174500\r
LOCATION:Hörsaal 2\r
CATEGORIES:Analysis\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Wöchentliche Sprechstunde\r
DTSTART:20250415T100000\r
RRULE:FREQ=WEEKLY\r
CATEGORIES:Algebra\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Fachschaftsfest\r
DTSTART:20250416T180000\r
DTEND:20250416T230000\r
CATEGORIES:Fachschaft\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Klausurtagung\r
DTSTART:20250422T090000Z\r
DTEND:20250424T150000Z\r
CATEGORIES:Algebra\r
END:VEVENT\r
END:VCALENDAR\r
";

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn categories() -> Vec<String> {
    vec!["Algebra".into(), "Analysis".into()]
}

#[test]
fn semester_list_from_feed_text() {
    let records = parse_calendar(SEMESTER_FEED).unwrap();
    assert_eq!(records.len(), 5);

    let events = Normalizer::list(BERLIN, &categories()).normalize_all(&records, None);
    let summaries: Vec<&str> = events.iter().map(|e| e.summary.as_str()).collect();
    // Recurring and foreign-category events are dropped
    assert_eq!(summaries, vec!["Vorlesungsbeginn", "Kolloquium", "Klausurtagung"]);

    let controller = Controller::new(
        ViewMode::Semester,
        events,
        CategorySelection::all(&categories()),
        at(2025, 4, 14, 12, 0),
        CategoryRule::Strict,
    );
    let view = controller.render();
    assert_eq!(view.title, "Sommersemester 2025");
    assert_eq!(view.event_count(), 3);

    let day = view
        .days
        .iter()
        .find(|d| d.date == NaiveDate::from_ymd_opt(2025, 4, 14).unwrap())
        .unwrap();
    assert_eq!(day.phase, DayPhase::Today);
    // In the list, all-day events follow the timed ones
    let on_day: Vec<&str> = day.events.iter().map(|r| r.event.summary.as_str()).collect();
    assert_eq!(on_day, vec!["Kolloquium", "Vorlesungsbeginn"]);

    let tagung = day_events(&view, 2025, 4, 23);
    assert_eq!(tagung, vec!["Klausurtagung"]);
    let after = day_events(&view, 2025, 4, 25);
    assert!(after.is_empty());
}

fn day_events<'a>(view: &semcal_core::RenderedView<'a>, y: i32, m: u32, d: u32) -> Vec<&'a str> {
    let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
    view.days
        .iter()
        .find(|g| g.date == date)
        .map(|g| g.events.iter().map(|r| r.event.summary.as_str()).collect())
        .unwrap_or_default()
}

#[test]
fn grid_view_follows_query_and_commands() {
    let algebra = "BEGIN:VCALENDAR\r
BEGIN:VEVENT\r
SUMMARY:Algebra-Seminar\r
DTSTART:20250312T100000\r
DTEND:20250312T113000\r
END:VEVENT\r
END:VCALENDAR\r
";
    let analysis = "BEGIN:VCALENDAR\r
BEGIN:VEVENT\r
SUMMARY:Analysis-Übung\r
DTSTART:20250312T080000\r
DTEND:20250312T093000\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:Blockkurs\r
DTSTART;VALUE=DATE:20250331\r
DTEND;VALUE=DATE:20250402\r
END:VEVENT\r
END:VCALENDAR\r
";

    let normalizer = Normalizer::grid(BERLIN);
    let mut events =
        normalizer.normalize_all(&parse_calendar(algebra).unwrap(), Some("Algebra"));
    events.extend(normalizer.normalize_all(&parse_calendar(analysis).unwrap(), Some("Analysis")));

    let (selection, mode) = CategorySelection::from_query("Analysis=0", &categories());
    assert_eq!(mode, ViewMode::Week);

    let mut controller = Controller::new(
        mode,
        events,
        selection,
        at(2025, 3, 12, 9, 0),
        CategoryRule::Strict,
    );
    assert_eq!(
        day_events(&controller.render(), 2025, 3, 12),
        vec!["Algebra-Seminar"]
    );

    let view = controller.apply(Command::ToggleCategory {
        category: "Analysis".into(),
    });
    assert_eq!(
        day_events(&view, 2025, 3, 12),
        vec!["Analysis-Übung", "Algebra-Seminar"]
    );
    assert_eq!(controller.query(), "");

    let view = controller.apply(Command::ToggleMode);
    assert_eq!(view.title, "März 2025");
    // The block course runs into April and shows in the trailing grid days
    assert_eq!(day_events(&view, 2025, 4, 1), vec!["Blockkurs"]);
    assert!(!view.days.last().unwrap().in_month);
    assert_eq!(controller.query(), "weekview=0");
}
