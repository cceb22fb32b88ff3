use axum::routing::{get, post, put};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{arena_handlers, ops_handlers, roster_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/arena/opponents", get(arena_handlers::list_opponents))
        .route(
            "/v1/arena/me/availability",
            get(arena_handlers::get_my_availability),
        )
        .route("/v1/arena/me/cooldown", get(arena_handlers::get_my_cooldown))
        .route(
            "/v1/arena/me/pvp",
            get(arena_handlers::get_my_pvp_status).put(arena_handlers::set_pvp_opt_in),
        )
        .route("/v1/arena/me/pvp/toggle", post(arena_handlers::toggle_pvp))
        .route("/v1/arena/battles", post(arena_handlers::fight))
        .route(
            "/v1/arena/me/battles",
            get(arena_handlers::get_my_battle_history),
        )
        .route(
            "/v1/roster/students",
            post(roster_handlers::provision_student),
        )
        .route(
            "/v1/roster/students/by-handle/:handle",
            get(roster_handlers::find_by_handle),
        )
        .route("/v1/roster/students/:id", get(roster_handlers::get_student))
        .route(
            "/v1/roster/students/:id/equipment",
            put(roster_handlers::equip_item),
        )
        .route(
            "/v1/roster/students/:id/equipment/:slot",
            axum::routing::delete(roster_handlers::unequip),
        )
        .route(
            "/v1/roster/students/:id/gold",
            post(roster_handlers::adjust_gold),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
