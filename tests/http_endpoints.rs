//! Integration tests driving the router end to end.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::json;

use common::{
    UnavailableCounterStore, create_farm, create_router_with_counter_store, create_test_router,
    send, send_raw, wait_for_count,
};

// =============================================================================
// Farm Endpoints
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_create_farm_returns_created_envelope() {
    let (app, _) = create_test_router();

    let (status, body) = send(
        &app,
        "POST",
        "/v1/farm",
        None,
        Some(json!({"id": " f1 ", "name": "North", "description": "rice"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["farm"]["id"], "f1");
    assert_eq!(body["data"]["farm"]["name"], "North");
    assert!(body["data"]["farm"]["created_at"].is_string());
}

#[rstest]
#[case(json!({"id": "", "name": "North", "description": "rice"}), "id", "Farm ID Required")]
#[case(json!({"id": "f1", "name": "  ", "description": "rice"}), "name", "Farm Name Required")]
#[case(json!({"id": "f1", "name": "North"}), "description", "Farm Description Required")]
#[tokio::test]
async fn test_create_farm_validation(
    #[case] payload: serde_json::Value,
    #[case] field: &str,
    #[case] message: &str,
) {
    let (app, _) = create_test_router();

    let (status, body) = send(&app, "POST", "/v1/farm", None, Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], message);
    assert_eq!(body["details"][0]["field"], field);
}

#[rstest]
#[tokio::test]
async fn test_create_duplicate_farm_conflicts() {
    let (app, state) = create_test_router();
    create_farm(&state, "f1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/farm",
        None,
        Some(json!({"id": "f1", "name": "North", "description": "rice"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_EXISTS");
    assert_eq!(body["message"], "Farm Already Exist");
}

#[rstest]
#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, _) = create_test_router();

    let status = send_raw(&app, "POST", "/v1/farm", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn test_get_missing_farm_is_not_found() {
    let (app, _) = create_test_router();

    let (status, body) = send(&app, "GET", "/v1/farm/ghost", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[rstest]
#[tokio::test]
async fn test_put_creates_then_updates() {
    let (app, _) = create_test_router();
    let payload = json!({"name": "Delta", "description": "river"});

    let (first, created) = send(&app, "PUT", "/v1/farm/f7", None, Some(payload)).await;
    let (second, updated) = send(
        &app,
        "PUT",
        "/v1/farm/f7",
        None,
        Some(json!({"name": "Delta East", "description": "river"})),
    )
    .await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(created["data"]["farm"]["id"], "f7");
    assert_eq!(updated["data"]["farm"]["name"], "Delta East");
    assert_eq!(
        updated["data"]["farm"]["created_at"],
        created["data"]["farm"]["created_at"]
    );
}

#[rstest]
#[tokio::test]
async fn test_delete_farm_twice_then_get() {
    let (app, state) = create_test_router();
    create_farm(&state, "f1").await;

    let (first, body) = send(&app, "DELETE", "/v1/farm/f1", None, None).await;
    let (second, _) = send(&app, "DELETE", "/v1/farm/f1", None, None).await;
    let (get, _) = send(&app, "GET", "/v1/farm/f1", None, None).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(body, json!({"data": null}));
    assert_eq!(second, StatusCode::OK);
    assert_eq!(get, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn test_delete_unknown_farm_is_not_found() {
    let (app, _) = create_test_router();

    let (status, _) = send(&app, "DELETE", "/v1/farm/ghost", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Listing
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_list_farms_third_page() {
    let (app, state) = create_test_router();
    for index in 0..25 {
        create_farm(&state, &format!("f{index:02}")).await;
    }

    let (status, body) = send(&app, "GET", "/v1/farm?page=3&limit=10", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["farms"].as_array().map(Vec::len), Some(5));
    assert_eq!(
        body["pagination"],
        json!({"page": 3, "limit": 10, "total_rows": 25, "total_pages": 3})
    );
}

#[rstest]
#[tokio::test]
async fn test_list_farms_normalises_bad_paging() {
    let (app, state) = create_test_router();
    create_farm(&state, "f1").await;

    let (status, body) = send(&app, "GET", "/v1/farm?page=0&limit=abc", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
}

#[rstest]
#[tokio::test]
async fn test_list_farms_sorted_by_name_descending() {
    let (app, state) = create_test_router();
    for id in ["a", "b", "c"] {
        create_farm(&state, id).await;
    }

    let (_, body) = send(&app, "GET", "/v1/farm?sort=name&order=desc", None, None).await;

    let ids: Vec<_> = body["data"]["farms"]
        .as_array()
        .unwrap()
        .iter()
        .map(|farm| farm["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
}

#[rstest]
#[tokio::test]
async fn test_list_with_unknown_sort_is_bad_request() {
    let (app, state) = create_test_router();
    create_farm(&state, "f1").await;

    let (status, _) = send(&app, "GET", "/v1/farm?sort=secret", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn test_empty_list_is_not_found() {
    let (app, _) = create_test_router();

    let (status, _) = send(&app, "GET", "/v1/pond", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Pond Endpoints
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_pond_lifecycle_against_deleted_farm() {
    let (app, _) = create_test_router();

    send(
        &app,
        "POST",
        "/v1/farm",
        None,
        Some(json!({"id": "f1", "name": "North", "description": "rice"})),
    )
    .await;
    let (created, _) = send(
        &app,
        "POST",
        "/v1/pond",
        None,
        Some(json!({"id": "p1", "farm_id": "f1", "name": "Koi", "description": "deep"})),
    )
    .await;
    send(&app, "DELETE", "/v1/farm/f1", None, None).await;
    let (rejected, body) = send(
        &app,
        "POST",
        "/v1/pond",
        None,
        Some(json!({"id": "p2", "farm_id": "f1", "name": "Koi", "description": "deep"})),
    )
    .await;

    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(rejected, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FARM_NOT_FOUND");
    assert_eq!(body["message"], "Farm Not Found");
}

#[rstest]
#[tokio::test]
async fn test_list_ponds_by_farm() {
    let (app, state) = create_test_router();
    create_farm(&state, "f1").await;
    create_farm(&state, "f2").await;
    common::create_pond(&state, "p1", "f1").await;
    common::create_pond(&state, "p2", "f2").await;

    let (status, body) = send(&app, "GET", "/v1/pond?farm_id=f1", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ponds"][0]["id"], "p1");
    assert_eq!(body["pagination"]["total_rows"], 1);
}

// =============================================================================
// Statistics
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_statistics_count_calls_and_user_agents() {
    let (app, _) = create_test_router();
    let agents = ["curl/8.0", "Mozilla/5.0", "PostmanRuntime/7.36"];

    for index in 0..10 {
        send(
            &app,
            "GET",
            "/v1/farm/ghost",
            Some(agents[index % agents.len()]),
            None,
        )
        .await;
    }

    let statistic = wait_for_count(&app, "GET /v1/farm/{id}", 10).await;
    assert_eq!(statistic["unique_user_agent"], 3);
}

#[rstest]
#[tokio::test]
async fn test_statistics_list_every_endpoint() {
    let (app, _) = create_test_router();

    let (status, body) = send(&app, "GET", "/v1/api/statistic", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["api_statistics"].as_array().map(Vec::len), Some(10));
    assert_eq!(body["data"]["api_statistics"][0]["count"], 0);
}

#[rstest]
#[tokio::test]
async fn test_missing_user_agent_counts_as_one_caller() {
    let (app, _) = create_test_router();

    send(&app, "GET", "/v1/pond", None, None).await;
    send(&app, "GET", "/v1/pond", None, None).await;

    let statistic = wait_for_count(&app, "GET /v1/pond", 2).await;
    assert_eq!(statistic["unique_user_agent"], 1);
}

#[rstest]
#[tokio::test]
async fn test_health_is_not_recorded() {
    let (app, _) = create_test_router();

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    send(&app, "GET", "/v1/api/statistic", None, None).await;
    let (_, statistics) = send(&app, "GET", "/v1/api/statistic", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    let total: i64 = statistics["data"]["api_statistics"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|statistic| statistic["count"].as_i64())
        .sum();
    assert_eq!(total, 0);
}

#[rstest]
#[tokio::test]
async fn test_requests_succeed_when_counter_store_is_down() {
    let (app, state) = create_router_with_counter_store(Arc::new(UnavailableCounterStore));

    let (created, body) = send(
        &app,
        "POST",
        "/v1/farm",
        Some("curl/8.0"),
        Some(json!({"id": "f1", "name": "North", "description": "rice"})),
    )
    .await;
    let (fetched, _) = send(&app, "GET", "/v1/farm/f1", Some("curl/8.0"), None).await;
    // Let the spawned recording tasks run and fail.
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(body["data"]["farm"]["id"], "f1");
    assert_eq!(fetched, StatusCode::OK);
    assert!(state.farms.get_by_id("f1").await.unwrap().is_some());
}

#[rstest]
#[tokio::test]
async fn test_statistics_report_store_failure_as_internal_error() {
    let (app, _) = create_router_with_counter_store(Arc::new(UnavailableCounterStore));

    let (status, body) = send(&app, "GET", "/v1/api/statistic", None, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    assert!(!body["message"].as_str().unwrap().contains("refused"));
}

// =============================================================================
// Extractor Rejections
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_repeated_query_parameter_is_json_error() {
    let (app, state) = create_test_router();
    create_farm(&state, "f1").await;

    let (status, body) = send(&app, "GET", "/v1/farm?name=a&name=b", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_QUERY");
    assert!(body["message"].is_string());
}

#[rstest]
#[tokio::test]
async fn test_undecodable_path_is_json_error() {
    let (app, _) = create_test_router();

    let (status, body) = send(&app, "GET", "/v1/pond/%FF", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PATH");
}
