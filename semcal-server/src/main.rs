mod routes;
mod state;

use std::io::IsTerminal;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use chrono::NaiveDate;
use semcal_core::{Clock, RolloverWatch, SemcalConfig, SystemClock};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    Ok(())
}

/// Forward date changes from the watcher into both controllers.
fn spawn_rollover(
    state: &AppState,
    clock: Arc<dyn Clock>,
    interval: Duration,
    today: NaiveDate,
) -> RolloverWatch {
    let (watch, mut dates) = RolloverWatch::spawn(clock.clone(), interval, today);
    let state = state.clone();
    tokio::spawn(async move {
        while dates.recv().await.is_some() {
            let now = clock.now();
            let mut session = state.session.lock().await;
            session.grid.on_tick(now);
            if let Some(semester) = session.semester.as_mut() {
                semester.on_tick(now);
            }
        }
    });
    watch
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = SemcalConfig::load().context("Failed to load config")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock {
        timezone: config.timezone()?,
    });

    let now = clock.now();
    let state = AppState::load(&config, now).await?;
    {
        let session = state.session.lock().await;
        for failure in &session.failures {
            warn!(location = %failure.location, "{}", failure.error);
        }
    }

    let _rollover = spawn_rollover(&state, clock, config.rollover_interval()?, now.date());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::view::router())
        .merge(routes::events::router())
        .merge(routes::feeds::router())
        .with_state(state)
        .layer(ServiceBuilder::new().layer(cors));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server.port));
    info!("semcal-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
