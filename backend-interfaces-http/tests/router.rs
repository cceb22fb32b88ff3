use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::DateTime;
use serde_json::{json, Value};
use tower::ServiceExt;

use backend_application::{AppState, Metrics};
use backend_domain::{BattleRolls, RuntimeConfig};
use backend_infrastructure::{
    DefaultHealthService, InMemoryBattleLog, JsonRosterRepository, ManualClock, ScriptedRollSource,
};
use backend_interfaces_http::build_router;

const TOKEN: &str = "test-token";

fn app() -> (Router, Arc<ScriptedRollSource>) {
    let roster = Arc::new(JsonRosterRepository::in_memory());
    let battle_log = Arc::new(InMemoryBattleLog::new());
    let rolls = Arc::new(ScriptedRollSource::new(Vec::new()));
    let start = DateTime::from_timestamp(1_767_254_400, 0).expect("start");
    let state = AppState {
        config: RuntimeConfig {
            api_token: Some(TOKEN.to_string()),
            ..RuntimeConfig::default()
        },
        roster: roster.clone(),
        battle_log: battle_log.clone(),
        rolls: rolls.clone(),
        clock: Arc::new(ManualClock::new(start)),
        health: Arc::new(DefaultHealthService::new(roster, battle_log)),
        metrics: Arc::new(Metrics::default()),
    };
    (build_router(state), rolls)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    caller: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", TOKEN));
    if let Some(id) = caller {
        builder = builder.header("X-Student-Id", id.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn provision(router: &Router, id: i64, handle: &str, gold: u64, power: u32) {
    let (status, _) = send(
        router,
        Method::POST,
        "/v1/roster/students",
        None,
        Some(json!({
            "studentId": id,
            "handle": handle,
            "displayName": handle.to_uppercase(),
            "gold": gold,
            "classIds": ["7a"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        router,
        Method::PUT,
        &format!("/v1/roster/students/{}/equipment", id),
        None,
        Some(json!({"id": "blade", "name": "Blade", "slot": "artifact", "power": power})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_token_or_caller_is_unauthorized() {
    let (router, _) = app();
    let request = Request::builder()
        .uri("/v1/arena/me/availability")
        .header("X-Student-Id", "1")
        .body(Body::empty())
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = send(&router, Method::GET, "/v1/arena/me/availability", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn fight_over_http_settles_and_records_history() {
    let (router, rolls) = app();
    provision(&router, 1, "ana", 50, 10).await;
    provision(&router, 2, "bia", 200, 8).await;
    rolls.push(BattleRolls {
        attacker_die: 5,
        defender_die: 4,
        transfer_ratio: 0.12,
    });

    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/arena/battles",
        Some(1),
        Some(json!({"targetHandle": "bia"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"]["winner"], "attacker");
    assert_eq!(body["outcome"]["goldTransferred"], 24);
    assert_eq!(body["attackerGold"], 74);
    assert_eq!(body["defenderGold"], 176);

    let (status, body) = send(&router, Method::GET, "/v1/arena/me/battles", Some(2), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["result"], "lose");
    assert_eq!(body[0]["goldTransferred"], 24);
    assert_eq!(body[0]["goldDelta"], -24);

    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/arena/battles",
        Some(1),
        Some(json!({"targetId": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap_or_default().contains("cooldown"));
}

#[tokio::test]
async fn self_target_and_unknown_target_map_to_client_errors() {
    let (router, _) = app();
    provision(&router, 1, "ana", 50, 3).await;

    let (status, _) = send(
        &router,
        Method::POST,
        "/v1/arena/battles",
        Some(1),
        Some(json!({"targetId": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        Method::POST,
        "/v1/arena/battles",
        Some(1),
        Some(json!({"targetHandle": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pvp_status_can_be_set_and_toggled() {
    let (router, _) = app();
    provision(&router, 1, "ana", 50, 3).await;

    let (status, body) = send(
        &router,
        Method::PUT,
        "/v1/arena/me/pvp",
        Some(1),
        Some(json!({"pvpOptIn": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pvpOptIn"], false);

    let (_, body) = send(&router, Method::POST, "/v1/arena/me/pvp/toggle", Some(1), None).await;
    assert_eq!(body["pvpOptIn"], true);

    let (_, body) = send(&router, Method::GET, "/v1/arena/me/availability", Some(7), None).await;
    assert_eq!(body["pvpOptIn"], true);
    assert_eq!(body["cooldownUntil"], Value::Null);
}

#[tokio::test]
async fn roster_admin_routes() {
    let (router, _) = app();
    provision(&router, 1, "ana", 50, 3).await;

    let (status, body) = send(
        &router,
        Method::POST,
        "/v1/roster/students/1/gold",
        None,
        Some(json!({"delta": -80})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap_or_default().contains("insufficient gold"));

    let (status, _) = send(&router, Method::DELETE, "/v1/roster/students/1/equipment/cape", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        Method::DELETE,
        "/v1/roster/students/1/equipment/artifact",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equipment"], json!({}));

    let (status, body) = send(&router, Method::GET, "/v1/roster/students/by-handle/ana", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["studentId"], 1);
}

#[tokio::test]
async fn health_and_metrics() {
    let (router, _) = app();
    let (status, _) = send(&router, Method::GET, "/v1/ops/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .uri("/v1/ops/metrics/prometheus")
        .header("Authorization", format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let text = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(text.contains("arena_battles_total 0"));
}
