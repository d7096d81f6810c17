use anyhow::Result;
use semcal_core::{Clock, EventDetail, Layout, SystemClock};

use crate::commands::{load_config, load_controller, report_failures};
use crate::render::{Palette, Render};

pub async fn run(index: usize, semester: bool) -> Result<()> {
    let config = load_config()?;
    let clock = SystemClock {
        timezone: config.timezone()?,
    };
    let layout = if semester { Layout::List } else { Layout::Grid };

    let (controller, failures) = load_controller(&config, layout, clock.now()).await?;
    report_failures(&failures);

    let Some(event) = controller.event(index) else {
        anyhow::bail!(
            "Event #{} not found ({} events loaded)",
            index,
            controller.events().len()
        );
    };

    let detail = EventDetail::new(event, controller.selection().known());
    println!("{}", detail.render_with(&Palette::new(&config)));
    Ok(())
}
