// Ad endpoint integration tests against the in-memory backend

mod common;

use axum::http::StatusCode;
use common::{send_json, test_app};
use nostr_adboard::generate_key_pair;
use serde_json::json;

#[tokio::test]
async fn ad_lifecycle_create_click_delete() {
    let app = test_app();

    let (status, ad) = send_json(
        &app,
        "POST",
        "/api/ads",
        Some(json!({
            "title": "X",
            "targetUrl": "http://x",
            "budget": 10000,
            "duration": 7
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ad["impressions"], 0);
    assert_eq!(ad["clicks"], 0);
    assert_eq!(ad["status"], "pending");
    let id = ad["id"].as_i64().expect("ad id");

    for expected in 1..=2 {
        let (status, body) =
            send_json(&app, "POST", &format!("/api/ads/{}/click", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["clicks"], expected);
    }

    let (status, _) = send_json(&app, "DELETE", &format!("/api/ads/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send_json(&app, "GET", &format!("/api/ads/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Ad not found");
}

#[tokio::test]
async fn sequential_impressions_are_lossless() {
    let app = test_app();

    let (_, ad) = send_json(
        &app,
        "POST",
        "/api/ads",
        Some(json!({
            "title": "Banner",
            "targetUrl": "https://example.com",
            "budget": 100,
            "duration": 1
        })),
    )
    .await;
    let id = ad["id"].as_i64().expect("ad id");

    let mut last = 0;
    for _ in 0..10 {
        let (status, body) =
            send_json(&app, "POST", &format!("/api/ads/{}/impression", id), None).await;
        assert_eq!(status, StatusCode::OK);
        last = body["impressions"].as_i64().expect("count");
    }
    assert_eq!(last, 10);

    let (_, fetched) = send_json(&app, "GET", &format!("/api/ads/{}", id), None).await;
    assert_eq!(fetched["impressions"], 10);
    assert_eq!(fetched["clicks"], 0);
}

#[tokio::test]
async fn malformed_ids_return_400() {
    let app = test_app();

    for uri in [
        "/api/ads/abc",
        "/api/ads/abc/impression",
        "/api/ads/abc/click",
    ] {
        let method = if uri == "/api/ads/abc" { "GET" } else { "POST" };
        let (status, body) = send_json(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["message"], "Invalid ad ID");
    }

    let (status, body) = send_json(&app, "GET", "/api/ads/user/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user ID");
}

#[tokio::test]
async fn missing_records_return_404() {
    let app = test_app();

    let cases = [
        ("GET", "/api/ads/999"),
        ("DELETE", "/api/ads/999"),
        ("POST", "/api/ads/999/impression"),
        ("POST", "/api/ads/999/click"),
    ];
    for (method, uri) in cases {
        let (status, body) = send_json(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body["message"], "Ad not found");
    }

    let (status, _) = send_json(
        &app,
        "PATCH",
        "/api/ads/999",
        Some(json!({ "status": "active" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_invalid_payloads() {
    let app = test_app();

    // Missing required fields
    let (status, body) = send_json(&app, "POST", "/api/ads", Some(json!({ "title": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid data");

    // Malformed target URL fails schema validation with field errors
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/ads",
        Some(json!({
            "title": "X",
            "targetUrl": "not a url",
            "budget": 1,
            "duration": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid data");
    assert!(body["errors"].is_object());

    // Unknown status value
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/ads",
        Some(json!({
            "title": "X",
            "targetUrl": "http://x",
            "budget": 1,
            "duration": 1,
            "status": "archived"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_checks_owner_exists() {
    let app = test_app();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/ads",
        Some(json!({
            "userId": 42,
            "title": "X",
            "targetUrl": "http://x",
            "budget": 1,
            "duration": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Referenced user does not exist");
}

#[tokio::test]
async fn ads_are_filtered_by_owner() {
    let app = test_app();

    let pair = generate_key_pair();
    let (status, user) = send_json(
        &app,
        "POST",
        "/api/auth/register",
        Some(json!({
            "username": "owner",
            "password": "pw",
            "npub": pair.npub
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().expect("user id");

    for title in ["first", "second"] {
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/ads",
            Some(json!({
                "userId": user_id,
                "title": title,
                "targetUrl": "http://x",
                "budget": 1,
                "duration": 1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    // One unowned ad that must not show up
    send_json(
        &app,
        "POST",
        "/api/ads",
        Some(json!({
            "title": "stray",
            "targetUrl": "http://x",
            "budget": 1,
            "duration": 1
        })),
    )
    .await;

    let (status, owned) =
        send_json(&app, "GET", &format!("/api/ads/user/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let owned = owned.as_array().expect("array");
    assert_eq!(owned.len(), 2);
    assert!(owned.iter().all(|ad| ad["userId"] == user_id));

    let (status, all) = send_json(&app, "GET", "/api/ads", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().expect("array").len(), 3);
}

#[tokio::test]
async fn patch_merges_partial_fields() {
    let app = test_app();

    let (_, ad) = send_json(
        &app,
        "POST",
        "/api/ads",
        Some(json!({
            "title": "Original",
            "description": "keep me",
            "targetUrl": "http://x",
            "budget": 5,
            "duration": 5
        })),
    )
    .await;
    let id = ad["id"].as_i64().expect("ad id");

    let (status, updated) = send_json(
        &app,
        "PATCH",
        &format!("/api/ads/{}", id),
        Some(json!({ "status": "active", "budget": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "active");
    assert_eq!(updated["budget"], 9);
    assert_eq!(updated["title"], "Original");
    assert_eq!(updated["description"], "keep me");

    // Status transitions are caller-directed; any value may replace any other
    let (status, updated) = send_json(
        &app,
        "PATCH",
        &format!("/api/ads/{}", id),
        Some(json!({ "status": "pending" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "pending");

    // An empty patch is a no-op read
    let (status, unchanged) =
        send_json(&app, "PATCH", &format!("/api/ads/{}", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["budget"], 9);
}

#[tokio::test]
async fn health_reports_storage_backend() {
    let app = test_app();

    let (status, body) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["components"]["storage"]["backend"], "memory");
}
