//! Dashboard Routes
//!
//! Read-only view of what the poller has rendered.
//!
//! - GET /api/v1/dashboard - Every field and chart
//! - GET /api/v1/fields/:id - One text slot (e.g. `glucoseCurrent`)
//! - GET /api/v1/charts/:id - One chart (e.g. `glucoseChart`)
//! - GET /api/v1/poller - Poll loop statistics

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ChartResponse, FieldResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::display::{ChartMount, RenderedView, Slot};
use crate::poller::PollStats;

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<RenderedView> {
    Json(state.view.snapshot())
}

/// GET /api/v1/fields/:id
pub async fn get_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FieldResponse>> {
    let slot: Slot = id.parse()?;

    let text = state
        .view
        .field(slot)
        .ok_or_else(|| ApiError::NotRendered(slot.id().to_string()))?;

    Ok(Json(FieldResponse {
        id: slot.id().to_string(),
        text,
    }))
}

/// GET /api/v1/charts/:id
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChartResponse>> {
    let mount: ChartMount = id.parse()?;

    let chart = state
        .view
        .chart(mount)
        .ok_or_else(|| ApiError::NotRendered(mount.id().to_string()))?;

    Ok(Json(ChartResponse {
        id: mount.id().to_string(),
        chart,
    }))
}

/// GET /api/v1/poller
pub async fn get_poller_stats(State(state): State<Arc<AppState>>) -> Json<PollStats> {
    Json(state.poller.stats())
}
