use anyhow::{Result, bail};
use semcal_core::{CategorySelection, ViewMode};

use crate::commands::load_config;

pub fn run(query: Option<&str>, hide: &[String], show: &[String], month: bool) -> Result<()> {
    let config = load_config()?;
    let known = config.category_names();

    let (mut selection, mut mode) = match query {
        Some(query) => CategorySelection::from_query(query, &known),
        None => (CategorySelection::all(&known), ViewMode::Week),
    };
    if month {
        mode = ViewMode::Month;
    }

    for category in hide.iter().chain(show) {
        if !known.contains(category) {
            bail!(
                "Category '{}' not found. Available: {}",
                category,
                known.join(", ")
            );
        }
    }
    for category in hide {
        if selection.is_active(category) {
            selection.toggle(category);
        }
    }
    for category in show {
        if !selection.is_active(category) {
            selection.toggle(category);
        }
    }

    if selection.active().next().is_none() {
        bail!("At least one category has to stay visible");
    }

    println!("{}", selection.to_query(mode));
    Ok(())
}
