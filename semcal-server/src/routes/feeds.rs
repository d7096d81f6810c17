//! Feed reload endpoint

use axum::{Json, Router, extract::State, routing::post};
use semcal_core::FeedFailure;
use serde::Serialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/reload", post(reload))
}

#[derive(Serialize)]
pub struct ReloadResult {
    pub events: usize,
    pub failures: Vec<FeedFailure>,
}

/// POST /reload - Refetch all feeds
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResult>, AppError> {
    let failures = state.reload().await;

    let session = state.session.lock().await;
    let events = session.grid.events().len()
        + session.semester.as_ref().map_or(0, |c| c.events().len());

    Ok(Json(ReloadResult { events, failures }))
}
