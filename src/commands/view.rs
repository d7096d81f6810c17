use std::sync::Arc;

use anyhow::Result;
use semcal_core::{
    CategorySelection, Clock, Command, Controller, RolloverWatch, SystemClock, ViewMode,
};
use tracing::debug;

use crate::ViewArgs;
use crate::commands::{load_config, load_controller, report_failures};
use crate::render::{Palette, Render};

pub async fn run(mode: ViewMode, args: ViewArgs, query: Option<String>) -> Result<()> {
    let config = load_config()?;
    let clock = SystemClock {
        timezone: config.timezone()?,
    };
    let now = clock.now();

    let (mut controller, failures) = load_controller(&config, mode.layout(), now).await?;
    report_failures(&failures);

    if let Some(query) = query {
        let (selection, _) = CategorySelection::from_query(&query, controller.selection().known());
        controller.set_selection(selection, None);
    }
    controller.apply(Command::SetMode { mode });
    if let Some(date) = args.date {
        controller.go_to(date);
    }
    if args.offset != 0 {
        controller.apply(Command::Navigate { steps: args.offset });
    }

    let palette = Palette::new(&config);
    print_view(&controller, &palette, args.json)?;

    if args.watch {
        let interval = config.rollover_interval()?;
        watch(&mut controller, &palette, Arc::new(clock), interval, args.json).await?;
    }

    Ok(())
}

fn print_view(controller: &Controller, palette: &Palette, json: bool) -> Result<()> {
    let view = controller.render();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", view.render_with(palette));
    }
    Ok(())
}

/// Redraw whenever the date changes, until interrupted.
async fn watch(
    controller: &mut Controller,
    palette: &Palette<'_>,
    clock: Arc<dyn Clock>,
    interval: std::time::Duration,
    json: bool,
) -> Result<()> {
    let (_watch, mut dates) = RolloverWatch::spawn(clock.clone(), interval, controller.today());

    loop {
        tokio::select! {
            date = dates.recv() => {
                let Some(date) = date else { break };
                debug!(%date, "redrawing for new date");
                if controller.on_tick(clock.now()) {
                    println!();
                    print_view(controller, palette, json)?;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}
