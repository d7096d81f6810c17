//! Terminal rendering for semcal-core types.
//!
//! Category names are drawn in their configured colors using owo_colors.

use owo_colors::OwoColorize;
use semcal_core::format::{self, NO_EVENTS_DAY, NO_EVENTS_VIEW, TODAY_LABEL};
use semcal_core::{
    DayGroup, DayPhase, EventDetail, EventRef, RenderedView, SemcalConfig, ViewMode,
};

/// Category colors from the config.
pub struct Palette<'a> {
    config: &'a SemcalConfig,
}

impl<'a> Palette<'a> {
    pub fn new(config: &'a SemcalConfig) -> Self {
        Palette { config }
    }

    /// Draw `text` in the color of `category`, or dimmed if it has none.
    pub fn paint(&self, category: &str, text: &str) -> String {
        match self.config.color_for(category).and_then(parse_hex) {
            Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
            None => text.dimmed().to_string(),
        }
    }
}

/// `#rrggbb` to its components
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render_with(&self, palette: &Palette) -> String;
}

impl Render for EventRef<'_> {
    fn render_with(&self, palette: &Palette) -> String {
        let event = self.event;
        let time = format::start_label(event);
        let tag = palette.paint(&event.main_category, &format!("[{}]", event.main_category));
        format!(
            "  {:>5}  {}  {} {} {}",
            time,
            event,
            event.location.display().dimmed(),
            tag,
            format!("#{}", self.id).dimmed()
        )
    }
}

impl Render for DayGroup<'_> {
    fn render_with(&self, palette: &Palette) -> String {
        let header = match self.phase {
            DayPhase::Today => format!("{} {}", self.label.bold(), TODAY_LABEL.green()),
            DayPhase::Past => self.label.dimmed().to_string(),
            DayPhase::Future if !self.in_month => self.label.dimmed().to_string(),
            DayPhase::Future => self.label.bold().to_string(),
        };

        let mut lines = vec![header];
        if self.events.is_empty() {
            lines.push(format!("  {}", NO_EVENTS_DAY.dimmed()));
        }
        lines.extend(self.events.iter().map(|e| e.render_with(palette)));
        lines.join("\n")
    }
}

impl Render for RenderedView<'_> {
    fn render_with(&self, palette: &Palette) -> String {
        let mut blocks = vec![format!("📅 {}", self.title.bold())];

        if self.is_empty() {
            blocks.push(NO_EVENTS_VIEW.dimmed().to_string());
            return blocks.join("\n\n");
        }

        // The semester list only shows days that have events
        blocks.extend(
            self.days
                .iter()
                .filter(|day| self.mode != ViewMode::Semester || !day.events.is_empty())
                .map(|day| day.render_with(palette)),
        );
        blocks.join("\n\n")
    }
}

impl Render for EventDetail {
    fn render_with(&self, palette: &Palette) -> String {
        let mut lines = vec![
            self.summary.bold().to_string(),
            self.title.clone(),
            self.location_label.dimmed().to_string(),
        ];

        let chips: Vec<String> = self
            .categories
            .iter()
            .map(|chip| {
                if chip.known {
                    palette.paint(&chip.name, &chip.name)
                } else {
                    chip.name.dimmed().to_string()
                }
            })
            .collect();
        lines.push(chips.join(", "));

        if !self.description_lines.is_empty() {
            lines.push(String::new());
            lines.extend(self.description_lines.iter().cloned());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex("#1f78b4"), Some((0x1f, 0x78, 0xb4)));
        assert_eq!(parse_hex("1f78b4"), None);
        assert_eq!(parse_hex("#1f78b"), None);
        assert_eq!(parse_hex("#zz78b4"), None);
    }
}
