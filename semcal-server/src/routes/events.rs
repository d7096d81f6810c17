//! Event detail endpoint

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use semcal_core::EventDetail;

use crate::routes::{AppError, LayoutParam, no_semester};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/events/{index}", get(get_event))
}

/// GET /events/{index} - Details of one event, by its `id` in a view
async fn get_event(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Query(params): Query<LayoutParam>,
) -> Result<Json<EventDetail>, AppError> {
    let session = state.session.lock().await;
    let controller = session.controller(params.layout).ok_or_else(no_semester)?;

    let event = controller
        .event(index)
        .ok_or_else(|| AppError::not_found(format!("Event not found: {}", index)))?;

    Ok(Json(EventDetail::new(event, controller.selection().known())))
}
