use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
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

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn search_swipe_select_and_outreach_flow() {
    let app = create_router(test_state());

    // Search loads the fixture pool and ranks it.
    let (status, search) = send(&app, json_request("POST", "/api/search", json!({"query": ""}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(search["accepted"], true);
    assert_eq!(search["loaded"], 6);
    assert_eq!(search["skipped_malformed"], 0);

    // The listing comes back sorted by overall score descending with ranks
    // assigned by the engine.
    let (status, listing) = send(&app, get_request("/api/candidates")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = listing["candidates"].as_array().unwrap();
    assert_eq!(rows.len(), 6);
    let scores: Vec<i64> = rows
        .iter()
        .map(|row| row["breakdown"]["overall_score"].as_i64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    assert_eq!(rows[0]["breakdown"]["rank"], 1);

    let top_id = rows[0]["id"].as_str().unwrap().to_string();
    let second_id = rows[1]["id"].as_str().unwrap().to_string();

    // The swipe cursor starts at the top-ranked candidate.
    let (status, next) = send(&app, get_request("/api/swipe/next")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(next["candidate"]["id"], top_id.as_str());
    assert_eq!(next["remaining"], 6);

    // Accepting selects; a rapid duplicate swipe is an idempotent no-op.
    let (status, swipe) = send(
        &app,
        json_request(
            "POST",
            "/api/swipe",
            json!({"candidate_id": top_id, "decision": "accept"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(swipe["outcome"], "recorded");
    assert_eq!(swipe["selected"], true);
    assert_eq!(swipe["remaining"], 5);

    let (status, repeat) = send(
        &app,
        json_request(
            "POST",
            "/api/swipe",
            json!({"candidate_id": top_id, "decision": "reject"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(repeat["outcome"], "already_decided");
    assert_eq!(repeat["selected"], true);
    assert_eq!(repeat["remaining"], 5);

    // List selection is additive with swipe decisions.
    let (status, toggled) = send(
        &app,
        json_request(
            "POST",
            "/api/selection/toggle",
            json!({"candidate_id": second_id}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["selected"], true);
    assert_eq!(toggled["count"], 2);

    let (status, selection) = send(&app, get_request("/api/selection")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(selection["count"], 2);
    assert_eq!(selection["candidates"][0]["id"], top_id.as_str());
    assert_eq!(selection["candidates"][1]["id"], second_id.as_str());

    // Outreach produces one non-empty message per selected candidate, in
    // selection order.
    let (status, outreach) = send(
        &app,
        json_request(
            "POST",
            "/api/outreach",
            json!({
                "config": {
                    "message_type": "email",
                    "tone": "friendly",
                    "length": "long"
                },
                "sender": {
                    "sender_name": "Jordan Lee",
                    "company": "Northbeam",
                    "industry": "logistics",
                    "departments": ["Platform"],
                    "locations": ["Berlin", "remote"]
                }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let messages = outreach["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["candidate_id"], top_id.as_str());
    assert_eq!(messages[1]["candidate_id"], second_id.as_str());
    for message in messages {
        assert_eq!(message["source"], "template");
        assert!(!message["body"].as_str().unwrap().is_empty());
        assert!(!message["subject"].as_str().unwrap().is_empty());
        assert!(message["estimated_response_rate"].as_f64().unwrap() > 0.0);
    }
}

#[tokio::test]
async fn sort_toggle_flips_the_listing_direction() {
    let app = create_router(test_state());

    send(&app, json_request("POST", "/api/search", json!({"query": ""}))).await;

    let (_, desc) = send(&app, get_request("/api/candidates")).await;
    let desc_ids: Vec<String> = desc["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap().to_string())
        .collect();

    // Re-selecting the active key flips the direction instead of resetting.
    let (status, sort) = send(
        &app,
        json_request("POST", "/api/candidates/sort", json!({"key": "overall_score"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sort["sort_dir"], "asc");

    let (_, asc) = send(&app, get_request("/api/candidates")).await;
    let asc_ids: Vec<String> = asc["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap().to_string())
        .collect();

    let mut reversed = desc_ids.clone();
    reversed.reverse();
    assert_eq!(asc_ids, reversed);
}

#[tokio::test]
async fn min_score_filters_the_listing() {
    let app = create_router(test_state());

    send(&app, json_request("POST", "/api/search", json!({"query": ""}))).await;

    let (_, all) = send(&app, get_request("/api/candidates")).await;
    let top_score = all["candidates"][0]["breakdown"]["overall_score"]
        .as_u64()
        .unwrap();

    let (status, filtered) = send(
        &app,
        get_request(&format!("/api/candidates?min_score={top_score}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = filtered["candidates"].as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.len() < 6);
    assert!(rows
        .iter()
        .all(|row| row["breakdown"]["overall_score"].as_u64().unwrap() >= top_score));
}

#[tokio::test]
async fn a_new_search_supersedes_the_pool_and_prunes_selection() {
    let app = create_router(test_state());

    send(&app, json_request("POST", "/api/search", json!({"query": ""}))).await;

    let (_, listing) = send(&app, get_request("/api/candidates")).await;
    let top_id = listing["candidates"][0]["id"].as_str().unwrap().to_string();

    send(
        &app,
        json_request(
            "POST",
            "/api/selection/toggle",
            json!({"candidate_id": top_id}),
        ),
    )
    .await;

    // A narrower follow-up search replaces the pool; selections for ids that
    // survive are kept, stale ones dropped.
    let (_, search) = send(
        &app,
        json_request("POST", "/api/search", json!({"query": "kubernetes"})),
    )
    .await;
    assert_eq!(search["accepted"], true);
    let loaded = search["loaded"].as_u64().unwrap();
    assert!(loaded < 6);

    let (_, selection) = send(&app, get_request("/api/selection")).await;
    let still_selected = selection["count"].as_u64().unwrap();
    assert!(still_selected <= 1);
}

#[tokio::test]
async fn weight_edits_rerank_the_pool() {
    let app = create_router(test_state());

    send(&app, json_request("POST", "/api/search", json!({"query": ""}))).await;

    // Collapse the rubric to a single axis; the listing must rerank by it.
    let (status, weights) = send(
        &app,
        json_request(
            "PUT",
            "/api/weights",
            json!({"criteria": [{"key": "experience", "weight": 100.0, "label": "Experience"}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(weights["degenerate"], false);

    let (_, listing) = send(&app, get_request("/api/candidates")).await;
    // cand-002 has the highest experience sub-score in the fixture pool.
    assert_eq!(listing["candidates"][0]["id"], "cand-002");
    assert_eq!(
        listing["candidates"][0]["breakdown"]["overall_score"]
            .as_u64()
            .unwrap(),
        95
    );

    // Zeroing every weight degrades scores instead of erroring.
    let (status, weights) = send(
        &app,
        json_request(
            "PUT",
            "/api/weights",
            json!({"criteria": [{"key": "experience", "weight": 0.0, "label": "Experience"}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(weights["degenerate"], true);

    let (_, listing) = send(&app, get_request("/api/candidates")).await;
    assert!(listing["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .all(|row| row["breakdown"]["overall_score"] == 0));
}
