use crate::api::models::*;
use crate::storage::NewDistrict;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

pub async fn add_district_handler(
    State(state): State<AppState>,
    Json(request): Json<DistrictRequest>,
) -> Result<&'static str, AppError> {
    let district = NewDistrict::from(request);
    let state_id = district.state_id;
    let district_id = state.store.add_district(district).await?;

    info!(district_id, state_id, "District added");

    Ok("District Successfully Added")
}

pub async fn get_district_handler(
    State(state): State<AppState>,
    Path(district_id): Path<i64>,
) -> Result<Json<Lookup<DistrictResponse>>, AppError> {
    let found = state.store.get_district(district_id).await?;
    info!(district_id, found = found.is_some(), "Fetched district");

    Ok(Json(Lookup::from_row(found)))
}

pub async fn delete_district_handler(
    State(state): State<AppState>,
    Path(district_id): Path<i64>,
) -> Result<&'static str, AppError> {
    let removed = state.store.delete_district(district_id).await?;
    info!(district_id, removed, "District delete");

    Ok("District Removed")
}

pub async fn update_district_handler(
    State(state): State<AppState>,
    Path(district_id): Path<i64>,
    Json(request): Json<DistrictRequest>,
) -> Result<&'static str, AppError> {
    let updated = state.store.update_district(district_id, request.into()).await?;
    info!(district_id, updated, "District update");

    Ok("District Details Updated")
}

pub async fn district_details_handler(
    State(state): State<AppState>,
    Path(district_id): Path<i64>,
) -> Result<Json<Lookup<DistrictDetailsResponse>>, AppError> {
    let state_name = state.store.district_state_name(district_id).await?;
    info!(district_id, found = state_name.is_some(), "Fetched district details");

    Ok(Json(Lookup::from_row(state_name)))
}
