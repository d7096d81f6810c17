//! View, command and query endpoints

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use semcal_core::format::{FEED_ERROR, NO_EVENTS_VIEW};
use semcal_core::{CategorySelection, Command, Controller, FeedFailure, RenderedView};
use serde::{Deserialize, Serialize};

use crate::routes::{AppError, LayoutParam, no_semester};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/view", get(get_view))
        .route("/commands", axum::routing::post(apply_command))
        .route("/query", get(get_query).post(set_query))
}

/// A rendered view with everything the page around it needs.
#[derive(Serialize)]
pub struct ViewResponse<'a> {
    pub calendar_name: &'a str,
    #[serde(flatten)]
    pub view: RenderedView<'a>,
    pub is_empty: bool,
    /// Placeholder row for a view without events
    pub placeholder: Option<&'static str>,
    pub query: String,
    pub active_categories: Vec<&'a str>,
    pub colors: &'a BTreeMap<String, String>,
    /// Banner shown when a feed failed to load
    pub error: Option<&'static str>,
    pub failures: &'a [FeedFailure],
}

impl<'a> ViewResponse<'a> {
    fn new(
        state: &'a AppState,
        controller: &'a Controller,
        view: RenderedView<'a>,
        failures: &'a [FeedFailure],
    ) -> Self {
        let is_empty = view.is_empty();
        ViewResponse {
            calendar_name: &state.calendar_name,
            view,
            is_empty,
            placeholder: is_empty.then_some(NO_EVENTS_VIEW),
            query: controller.query(),
            active_categories: controller.selection().active().map(String::as_str).collect(),
            colors: &state.colors,
            error: (!failures.is_empty()).then_some(FEED_ERROR),
            failures,
        }
    }
}

/// Serialize while the session lock is held; the view borrows from it.
fn view_json(
    state: &AppState,
    controller: &Controller,
    view: RenderedView<'_>,
    failures: &[FeedFailure],
) -> Result<Json<serde_json::Value>, AppError> {
    let response = ViewResponse::new(state, controller, view, failures);
    Ok(Json(serde_json::to_value(&response)?))
}

/// GET /view - Render the current view
async fn get_view(
    State(state): State<AppState>,
    Query(params): Query<LayoutParam>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = state.session.lock().await;
    let controller = session.controller(params.layout).ok_or_else(no_semester)?;
    view_json(&state, controller, controller.render(), &session.failures)
}

/// POST /commands - Apply a command and render the result
async fn apply_command(
    State(state): State<AppState>,
    Query(params): Query<LayoutParam>,
    Json(command): Json<Command>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut session = state.session.lock().await;
    let (controller, failures) = session
        .controller_mut(params.layout)
        .ok_or_else(no_semester)?;
    controller.apply(command);

    let controller = &*controller;
    view_json(&state, controller, controller.render(), failures)
}

#[derive(Serialize, Deserialize)]
pub struct QueryBody {
    pub query: String,
}

/// GET /query - The current selection as a query string
async fn get_query(
    State(state): State<AppState>,
    Query(params): Query<LayoutParam>,
) -> Result<Json<QueryBody>, AppError> {
    let session = state.session.lock().await;
    let controller = session.controller(params.layout).ok_or_else(no_semester)?;
    Ok(Json(QueryBody {
        query: controller.query(),
    }))
}

/// POST /query - Restore the selection from a query string
async fn set_query(
    State(state): State<AppState>,
    Query(params): Query<LayoutParam>,
    Json(body): Json<QueryBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut session = state.session.lock().await;
    let (controller, failures) = session
        .controller_mut(params.layout)
        .ok_or_else(no_semester)?;

    let (selection, mode) =
        CategorySelection::from_query(&body.query, controller.selection().known());
    controller.set_selection(selection, Some(mode));

    let controller = &*controller;
    view_json(&state, controller, controller.render(), failures)
}
