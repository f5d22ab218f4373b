use crate::api::models::*;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

pub async fn list_states_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<StateResponse>>, AppError> {
    let states = state.store.list_states().await?;
    info!(count = states.len(), "Listing states");

    Ok(Json(states.into_iter().map(StateResponse::from).collect()))
}

pub async fn get_state_handler(
    State(state): State<AppState>,
    Path(state_id): Path<i64>,
) -> Result<Json<Lookup<StateResponse>>, AppError> {
    let found = state.store.get_state(state_id).await?;
    info!(state_id, found = found.is_some(), "Fetched state");

    Ok(Json(Lookup::from_row(found)))
}

pub async fn state_stats_handler(
    State(state): State<AppState>,
    Path(state_id): Path<i64>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.store.state_stats(state_id).await?;
    info!(state_id, total_cases = ?stats.total_cases, "Aggregated state stats");

    Ok(Json(stats.into()))
}
