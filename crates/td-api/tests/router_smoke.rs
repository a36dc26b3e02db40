use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use td_api::{create_router, test_state};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn liveness_and_readiness_report_ok() {
    let app = create_router(test_state());

    let response = app.clone().oneshot(get_request("/livez")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_a_request_id_header() {
    let app = create_router(test_state());

    let response = app.oneshot(get_request("/livez")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn candidates_listing_is_empty_before_any_search() {
    let app = create_router(test_state());

    let response = app.oneshot(get_request("/api/candidates")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["total"], 0);
    assert_eq!(json["sort_key"], "overall_score");
    assert_eq!(json["sort_dir"], "desc");
}

#[tokio::test]
async fn swiping_an_unknown_candidate_returns_a_structured_not_found() {
    let app = create_router(test_state());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/swipe",
            json!({"candidate_id": "ghost", "decision": "accept"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "not_found");
    assert!(json["message"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn outreach_without_a_selection_is_a_bad_request() {
    let app = create_router(test_state());

    let response = app
        .oneshot(json_request("POST", "/api/outreach", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "bad_request");
}

#[tokio::test]
async fn removing_an_unknown_criterion_returns_not_found() {
    let app = create_router(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/weights/criteria/no-such-axis")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn weights_listing_returns_the_seeded_criteria() {
    let app = create_router(test_state());

    let response = app.oneshot(get_request("/api/weights")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let keys: Vec<&str> = json["criteria"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, ["technical", "experience", "culture", "communication"]);
    assert_eq!(json["degenerate"], false);
}
