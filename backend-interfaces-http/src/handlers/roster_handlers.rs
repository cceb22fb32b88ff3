use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::roster_commands;
use backend_application::queries::roster_queries;
use backend_application::AppState;
use backend_domain::{
    EquipmentSlot, GoldAdjustmentRequest, GoldBalance, Item, ProvisionStudentRequest,
    StudentGameState, StudentId,
};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn provision_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ProvisionStudentRequest>,
) -> Result<(StatusCode, Json<StudentGameState>), HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let created = roster_commands::provision_student(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<StudentGameState>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(roster_queries::get_student(&state, StudentId(id)).await?))
}

pub async fn find_by_handle(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(handle): Path<String>,
) -> Result<Json<StudentGameState>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(roster_queries::find_by_handle(&state, &handle).await?))
}

pub async fn equip_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(item): Json<Item>,
) -> Result<Json<StudentGameState>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(roster_commands::equip_item(&state, StudentId(id), item).await?))
}

pub async fn unequip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, slot)): Path<(i64, String)>,
) -> Result<Json<StudentGameState>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let slot = slot
        .parse::<EquipmentSlot>()
        .map_err(|err| HttpError::BadRequest(err.to_string()))?;
    Ok(Json(roster_commands::unequip(&state, StudentId(id), slot).await?))
}

pub async fn adjust_gold(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<GoldAdjustmentRequest>,
) -> Result<Json<GoldBalance>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(roster_commands::adjust_gold(&state, StudentId(id), payload).await?))
}
