use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::arena_commands;
use backend_application::queries::arena_queries;
use backend_application::AppState;
use backend_domain::{
    AvailabilityView, BattleHistoryItem, CooldownView, FightRequest, FightResult, OpponentView,
    PvpStatusView,
};

use crate::error::HttpError;
use crate::middleware::authorize_caller;

pub async fn list_opponents(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<OpponentView>>, HttpError> {
    let caller = authorize_caller(&state.config, &headers)?;
    let opponents = arena_queries::list_opponents(&state, caller).await?;
    Ok(Json(opponents))
}

pub async fn get_my_availability(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AvailabilityView>, HttpError> {
    let caller = authorize_caller(&state.config, &headers)?;
    Ok(Json(arena_queries::get_my_availability(&state, caller).await?))
}

pub async fn get_my_cooldown(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CooldownView>, HttpError> {
    let caller = authorize_caller(&state.config, &headers)?;
    Ok(Json(arena_queries::get_my_cooldown(&state, caller).await?))
}

pub async fn get_my_pvp_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PvpStatusView>, HttpError> {
    let caller = authorize_caller(&state.config, &headers)?;
    Ok(Json(arena_queries::get_my_pvp_status(&state, caller).await?))
}

pub async fn set_pvp_opt_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PvpStatusView>,
) -> Result<Json<PvpStatusView>, HttpError> {
    let caller = authorize_caller(&state.config, &headers)?;
    let status = arena_commands::set_pvp_opt_in(&state, caller, payload.pvp_opt_in).await?;
    Ok(Json(status))
}

pub async fn toggle_pvp(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PvpStatusView>, HttpError> {
    let caller = authorize_caller(&state.config, &headers)?;
    Ok(Json(arena_commands::toggle_pvp(&state, caller).await?))
}

pub async fn fight(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<FightRequest>,
) -> Result<(StatusCode, Json<FightResult>), HttpError> {
    let caller = authorize_caller(&state.config, &headers)?;
    let result = arena_commands::fight(&state, caller, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn get_my_battle_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BattleHistoryItem>>, HttpError> {
    let caller = authorize_caller(&state.config, &headers)?;
    Ok(Json(arena_queries::get_my_battle_history(&state, caller).await?))
}
