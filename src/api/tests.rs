//! Tests for the HTTP routes.

use super::*;
use crate::storage::CovidStore;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

fn create_test_app() -> (App, CovidStore) {
    let store = CovidStore::in_memory();
    store.seed_state(1, "Andaman and Nicobar Islands", 380_581);
    store.seed_state(21, "Maharashtra", 112_374_333);
    store.seed_state(30, "Goa", 1_458_545);

    let app = app(AppState {
        store: store.clone(),
    });
    (app, store)
}

async fn send(
    app: &App,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: &App, uri: &str) -> Value {
    let (status, body) = send(app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}");
    serde_json::from_slice(&body).unwrap()
}

fn district_body(name: &str, state_id: i64, counters: [i64; 4]) -> Value {
    json!({
        "districtName": name,
        "stateId": state_id,
        "cases": counters[0],
        "cured": counters[1],
        "active": counters[2],
        "deaths": counters[3],
    })
}

async fn create_district(app: &App, body: Value) {
    let (status, text) = send(app, Method::POST, "/districts", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, b"District Successfully Added");
}

// =========================================================================
// Health
// =========================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.total_states, 3);
}

// =========================================================================
// States
// =========================================================================

#[tokio::test]
async fn test_list_states_with_and_without_trailing_slash() {
    let (app, _) = create_test_app();

    let with_slash = get_json(&app, "/states/").await;
    let without_slash = get_json(&app, "/states").await;
    assert_eq!(with_slash, without_slash);

    let states = with_slash.as_array().unwrap();
    assert_eq!(states.len(), 3);
    assert_eq!(
        states[0],
        json!({"stateId": 1, "stateName": "Andaman and Nicobar Islands", "population": 380_581})
    );
}

#[tokio::test]
async fn test_get_state_by_id() {
    let (app, _) = create_test_app();

    let state = get_json(&app, "/states/21").await;
    assert_eq!(
        state,
        json!({"stateId": 21, "stateName": "Maharashtra", "population": 112_374_333})
    );
}

#[tokio::test]
async fn test_unknown_state_is_empty_object() {
    let (app, _) = create_test_app();

    assert_eq!(get_json(&app, "/states/9999").await, json!({}));
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected_before_query() {
    let (app, _) = create_test_app();

    let (status, _) = send(&app, Method::GET, "/states/1%20OR%201=1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/districts/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =========================================================================
// Districts
// =========================================================================

#[tokio::test]
async fn test_create_then_get_district() {
    let (app, _) = create_test_app();

    create_district(&app, district_body("X", 21, [10, 5, 3, 2])).await;

    let district = get_json(&app, "/districts/1").await;
    assert_eq!(
        district,
        json!({
            "districtId": 1,
            "districtName": "X",
            "stateId": 21,
            "cases": 10,
            "cured": 5,
            "active": 3,
            "deaths": 2,
        })
    );
}

#[tokio::test]
async fn test_create_with_unknown_state_and_negative_counts_is_accepted() {
    let (app, store) = create_test_app();

    create_district(&app, district_body("Nowhere", 777, [-1, 0, -5, 0])).await;

    let row = store.get_district(1).await.unwrap().unwrap();
    assert_eq!(row.state_id, Some(777));
    assert_eq!(row.cases, Some(-1));
}

#[tokio::test]
async fn test_quoted_district_name_round_trips() {
    let (app, _) = create_test_app();
    let name = "Kanyakumari'); DELETE FROM district; --";

    create_district(&app, district_body(name, 21, [1, 0, 1, 0])).await;
    create_district(&app, district_body("Second", 21, [1, 0, 1, 0])).await;

    assert_eq!(get_json(&app, "/districts/1").await["districtName"], name);
    assert_eq!(get_json(&app, "/districts/2").await["districtName"], "Second");
}

#[tokio::test]
async fn test_create_with_missing_field_is_rejected() {
    let (app, store) = create_test_app();

    let body = json!({"districtName": "Partial", "stateId": 21});
    let (status, _) = send(&app, Method::POST, "/districts", Some(body)).await;

    assert!(status.is_client_error());
    assert!(store.get_district(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_district_is_empty_object() {
    let (app, _) = create_test_app();

    assert_eq!(get_json(&app, "/districts/4242").await, json!({}));
    assert_eq!(get_json(&app, "/districts/4242/details").await, json!({}));
}

#[tokio::test]
async fn test_update_district_twice_is_idempotent() {
    let (app, _) = create_test_app();
    create_district(&app, district_body("Old", 1, [1, 1, 1, 1])).await;

    let replacement = district_body("Pune", 21, [20, 10, 8, 2]);

    let (status, text) = send(&app, Method::PUT, "/districts/1", Some(replacement.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, b"District Details Updated");
    let after_first = get_json(&app, "/districts/1").await;

    send(&app, Method::PUT, "/districts/1", Some(replacement)).await;
    let after_second = get_json(&app, "/districts/1").await;

    assert_eq!(after_first, after_second);
    assert_eq!(after_second["districtName"], "Pune");
    assert_eq!(after_second["stateId"], 21);
    assert_eq!(after_second["cases"], 20);
}

#[tokio::test]
async fn test_delete_then_get_district() {
    let (app, _) = create_test_app();
    create_district(&app, district_body("Gone", 21, [3, 1, 1, 1])).await;

    let (status, text) = send(&app, Method::DELETE, "/districts/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, b"District Removed");

    assert_eq!(get_json(&app, "/districts/1").await, json!({}));
}

#[tokio::test]
async fn test_delete_unknown_district_still_succeeds() {
    let (app, _) = create_test_app();

    let (status, text) = send(&app, Method::DELETE, "/districts/555", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, b"District Removed");
}

// =========================================================================
// Aggregation & joins
// =========================================================================

#[tokio::test]
async fn test_state_stats_sums_districts() {
    let (app, _) = create_test_app();
    create_district(&app, district_body("A", 21, [10, 5, 3, 2])).await;
    create_district(&app, district_body("B", 21, [20, 5, 10, 5])).await;
    create_district(&app, district_body("Other", 1, [99, 99, 99, 99])).await;

    let stats = get_json(&app, "/states/21/stats").await;
    assert_eq!(
        stats,
        json!({"totalCases": 30, "totalCured": 10, "totalActive": 13, "totalDeaths": 7})
    );
}

#[tokio::test]
async fn test_state_stats_without_districts_are_null() {
    let (app, _) = create_test_app();

    let stats = get_json(&app, "/states/30/stats").await;
    assert_eq!(
        stats,
        json!({"totalCases": null, "totalCured": null, "totalActive": null, "totalDeaths": null})
    );
}

#[tokio::test]
async fn test_district_details_returns_state_name() {
    let (app, _) = create_test_app();
    create_district(&app, district_body("Mumbai", 21, [5, 1, 3, 1])).await;

    assert_eq!(
        get_json(&app, "/districts/1/details").await,
        json!({"stateName": "Maharashtra"})
    );
}

// =========================================================================
// Trailing slashes
// =========================================================================

#[tokio::test]
async fn test_trailing_slash_reaches_every_route() {
    let (app, _) = create_test_app();

    let (status, text) = send(
        &app,
        Method::POST,
        "/districts/",
        Some(district_body("Thane", 21, [4, 2, 1, 1])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, b"District Successfully Added");

    assert_eq!(get_json(&app, "/states/21/").await["stateName"], "Maharashtra");
    assert_eq!(get_json(&app, "/states/21/stats/").await["totalCases"], 4);
    assert_eq!(get_json(&app, "/districts/1/").await["districtName"], "Thane");
    assert_eq!(
        get_json(&app, "/districts/1/details/").await,
        json!({"stateName": "Maharashtra"})
    );

    let (status, text) = send(&app, Method::DELETE, "/districts/1/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, b"District Removed");
}

// =========================================================================
// NULL columns & failures
// =========================================================================

#[tokio::test]
async fn test_null_columns_are_returned_as_null() {
    let (app, store) = create_test_app();
    store.execute_raw(
        "INSERT INTO state (state_id, state_name, population) VALUES (2, 'Ladakh', NULL);
         INSERT INTO district (district_name, state_id, cases, cured, active, deaths)
         VALUES ('Leh', 2, 10, NULL, 4, 1);",
    );

    let states = get_json(&app, "/states/").await;
    assert_eq!(states.as_array().unwrap().len(), 4);
    assert_eq!(
        states[1],
        json!({"stateId": 2, "stateName": "Ladakh", "population": null})
    );

    assert_eq!(
        get_json(&app, "/states/2").await,
        json!({"stateId": 2, "stateName": "Ladakh", "population": null})
    );

    assert_eq!(
        get_json(&app, "/districts/1").await,
        json!({
            "districtId": 1,
            "districtName": "Leh",
            "stateId": 2,
            "cases": 10,
            "cured": null,
            "active": 4,
            "deaths": 1,
        })
    );

    let stats = get_json(&app, "/states/2/stats").await;
    assert_eq!(stats["totalCases"], 10);
    assert_eq!(stats["totalCured"], Value::Null);
}

#[tokio::test]
async fn test_query_failure_is_generic_server_error() {
    let (app, store) = create_test_app();
    store.execute_raw("DROP TABLE district;");

    let (status, body) = send(&app, Method::GET, "/districts/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["message"], "Internal server error");
    let raw = String::from_utf8(body).unwrap();
    assert!(!raw.contains("district"), "leaked detail: {raw}");

    let (status, _) = send(
        &app,
        Method::POST,
        "/districts",
        Some(district_body("Lost", 21, [1, 1, 1, 1])),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
