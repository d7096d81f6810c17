mod parse;
mod text;

pub use parse::{RawCalendarRecord, RawDate, parse_calendar};
pub use text::{TextError, split_text_list, unescape_text};
