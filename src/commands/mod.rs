pub mod event;
pub mod query;
pub mod view;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use semcal_core::format::FEED_ERROR;
use semcal_core::{
    CategorySelection, Controller, FeedFailure, FeedLoader, Layout, Normalizer, SemcalConfig,
};

fn create_spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")?,
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}

pub fn load_config() -> Result<SemcalConfig> {
    SemcalConfig::load().context("Failed to load config")
}

/// Fetch the feeds for `layout` and build a controller on them.
///
/// The selection covers all categories of that layout; the caller narrows
/// it down if needed.
pub async fn load_controller(
    config: &SemcalConfig,
    layout: Layout,
    now: NaiveDateTime,
) -> Result<(Controller, Vec<FeedFailure>)> {
    let timezone = config.timezone()?;
    let timeout = config.fetch_timeout()?;
    let config_path = SemcalConfig::config_path()?;

    let (normalizer, sources, known) = match layout {
        Layout::List => {
            let Some(source) = config.semester_source() else {
                bail!(
                    "No semester feed configured.\n\n\
                    Add a [semester] section to {}",
                    config_path.display()
                );
            };
            (
                Normalizer::list(timezone, config.semester_categories()),
                vec![source],
                config.semester_categories().to_vec(),
            )
        }
        Layout::Grid => {
            if config.feeds.is_empty() {
                bail!(
                    "No feeds configured.\n\n\
                    Add a [[feeds]] entry per category to {}",
                    config_path.display()
                );
            }
            (
                Normalizer::grid(timezone),
                config.grid_sources(),
                config.category_names(),
            )
        }
    };

    let loader = FeedLoader::new(normalizer, timeout)?;
    let spinner = create_spinner("Loading calendar feeds")?;
    let load = loader.load(&sources).await;
    spinner.finish_and_clear();

    let mode = match layout {
        Layout::List => semcal_core::ViewMode::Semester,
        Layout::Grid => semcal_core::ViewMode::Week,
    };
    let controller = Controller::new(
        mode,
        load.events,
        CategorySelection::all(&known),
        now,
        config.category_rule(),
    );
    Ok((controller, load.failures))
}

/// Print the feed error banner and what went wrong, to stderr.
pub fn report_failures(failures: &[FeedFailure]) {
    if failures.is_empty() {
        return;
    }
    eprintln!("{}", FEED_ERROR.red());
    for failure in failures {
        let name = failure.category.as_deref().unwrap_or(&failure.location);
        eprintln!("   {} {}", name, failure.error.dimmed());
    }
    eprintln!();
}
