//! Gateway HTTP Tests
//!
//! Drive `/send_request` through the full router:
//! - API keys are checked before anything else
//! - Dispatch errors come back as HTTP 500 envelopes
//! - Conditions guard PUT and DELETE

mod common;

use axum::http::StatusCode;
use common::{build_app, data_of, error_of, send, send_json, USER_KEY};
use serde_json::json;

// =============================================================================
// Health & Authentication
// =============================================================================

#[tokio::test]
async fn test_health_needs_no_key() {
    let app = build_app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["models"], 4);
    assert_eq!(body["exposed_models"], 3);
}

#[tokio::test]
async fn test_missing_api_key_is_rejected() {
    let app = build_app();
    let (status, body) = send(&app, "GET", "/send_request?model=res.partner", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(&body), "API key required");
}

#[tokio::test]
async fn test_invalid_api_key_is_rejected() {
    let app = build_app();
    let (status, body) = send(
        &app,
        "GET",
        "/send_request?model=res.partner",
        Some("not-a-key"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(&body), "Invalid API key");
}

#[tokio::test]
async fn test_rejected_key_never_reaches_store() {
    let app = build_app();
    let (status, _) = send_json(
        &app,
        "POST",
        "/send_request?model=res.partner",
        Some("not-a-key"),
        json!({"values": {"name": "Intruder"}}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send(
        &app,
        "GET",
        "/send_request?model=res.partner",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(data_of(&body).len(), 2);
}

// =============================================================================
// Model & Permission Resolution
// =============================================================================

#[tokio::test]
async fn test_unknown_model() {
    let app = build_app();
    let (status, body) = send(
        &app,
        "GET",
        "/send_request?model=res.nothing",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error_of(&body),
        "Invalid model, check spelling or maybe the related module is not installed"
    );

    let (_, body) = send(&app, "GET", "/send_request", Some(USER_KEY), None).await;
    assert!(error_of(&body).starts_with("Invalid model"));
}

#[tokio::test]
async fn test_model_without_permission_record() {
    let app = build_app();
    let (status, body) = send(
        &app,
        "GET",
        "/send_request?model=res.bank",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_of(&body), "No Record Created for the model");
}

#[tokio::test]
async fn test_disabled_verb() {
    let app = build_app();
    let (status, body) = send(
        &app,
        "GET",
        "/send_request?model=res.country",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_of(&body), "Method Not Allowed");
}

#[tokio::test]
async fn test_non_integer_id() {
    let app = build_app();
    let (_, body) = send(
        &app,
        "GET",
        "/send_request?model=res.partner&Id=abc",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(error_of(&body), "Invalid record id: abc");
}

// =============================================================================
// GET
// =============================================================================

#[tokio::test]
async fn test_get_encodes_field_types() {
    let app = build_app();
    let (status, body) = send(
        &app,
        "GET",
        "/send_request?model=res.partner",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let records = data_of(&body);
    assert_eq!(records.len(), 2);

    let azure = &records[0];
    assert_eq!(azure["id"], 1);
    assert_eq!(azure["last_login"], "2024-05-01T09:30:00");
    assert_eq!(azure["photo"], "aGVsbG8=");
    assert_eq!(azure["parent_id"], json!(null));

    let deco = &records[1];
    assert_eq!(deco["parent_id"], json!([1, "Azure Interior"]));
    assert_eq!(deco["display_name"], "Deco Addict");
}

#[tokio::test]
async fn test_get_by_id_with_fields() {
    let app = build_app();
    let (_, body) = send_json(
        &app,
        "GET",
        "/send_request?model=res.partner&Id=2",
        Some(USER_KEY),
        json!({"fields": ["name"]}),
    )
    .await;
    assert_eq!(data_of(&body), &vec![json!({"id": 2, "name": "Deco Addict"})]);
}

#[tokio::test]
async fn test_get_relation_condition_compares_id() {
    let app = build_app();
    let (_, body) = send_json(
        &app,
        "GET",
        "/send_request?model=sale.order",
        Some(USER_KEY),
        json!({"conditions": {"partner_id": 1}}),
    )
    .await;
    assert_eq!(data_of(&body).len(), 1);

    let (_, body) = send_json(
        &app,
        "GET",
        "/send_request?model=sale.order",
        Some(USER_KEY),
        json!({"conditions": {"partner_id": 2}}),
    )
    .await;
    assert_eq!(error_of(&body), "Invalid JSON Data: Resource not found");
}

#[tokio::test]
async fn test_get_ignores_malformed_body() {
    let app = build_app();
    let (status, body) = send(
        &app,
        "GET",
        "/send_request?model=res.partner&Id=1",
        Some(USER_KEY),
        Some("{\"conditions\": "),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_of(&body).len(), 1);
}

// =============================================================================
// POST
// =============================================================================

#[tokio::test]
async fn test_post_returns_requested_fields() {
    let app = build_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/send_request?model=res.partner",
        Some(USER_KEY),
        json!({
            "values": {"name": "Gemini Furniture", "email": "gemini@example.com", "parent_id": 1},
            "fields": ["name", "parent_id"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        data_of(&body),
        &vec![json!({"id": 3, "name": "Gemini Furniture", "parent_id": [1, "Azure Interior"]})]
    );
}

#[tokio::test]
async fn test_post_empty_fields_returns_every_field() {
    let app = build_app();
    let (status, body) = send_json(
        &app,
        "POST",
        "/send_request?model=res.partner",
        Some(USER_KEY),
        json!({"values": {"name": "Gemini Furniture"}, "fields": []}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let created = &data_of(&body)[0];
    assert_eq!(created["name"], "Gemini Furniture");
    assert_eq!(created["display_name"], "Gemini Furniture");
    assert_eq!(created["parent_id"], json!(null));
}

#[tokio::test]
async fn test_post_malformed_json() {
    let app = build_app();
    let (status, body) = send(
        &app,
        "POST",
        "/send_request?model=res.partner",
        Some(USER_KEY),
        Some("{\"values\": {\"name\": "),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_of(&body).contains("Invalid JSON Data"));
}

#[tokio::test]
async fn test_post_rejected_by_store() {
    let app = build_app();
    let (_, body) = send_json(
        &app,
        "POST",
        "/send_request?model=res.partner",
        Some(USER_KEY),
        json!({"values": {"email": "nameless@example.com"}}),
    )
    .await;
    assert!(error_of(&body).starts_with("Invalid JSON Data"));
}

// =============================================================================
// PUT
// =============================================================================

#[tokio::test]
async fn test_put_and_delete_without_id() {
    let app = build_app();
    for method in ["PUT", "DELETE"] {
        let (status, body) = send_json(
            &app,
            method,
            "/send_request?model=res.partner",
            Some(USER_KEY),
            json!({"values": {"email": "x@example.com"}}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_of(&body), "No ID Provided");
    }
}

#[tokio::test]
async fn test_put_and_delete_missing_record() {
    let app = build_app();
    for method in ["PUT", "DELETE"] {
        let (_, body) = send_json(
            &app,
            method,
            "/send_request?model=res.partner&Id=99",
            Some(USER_KEY),
            json!({"values": {"email": "x@example.com"}}),
        )
        .await;
        assert_eq!(error_of(&body), "Resource not found");
    }
}

#[tokio::test]
async fn test_put_condition_mismatch_leaves_record_unchanged() {
    let app = build_app();
    let (status, body) = send_json(
        &app,
        "PUT",
        "/send_request?model=sale.order&Id=1",
        Some(USER_KEY),
        json!({"values": {"state": "sale"}, "conditions": {"state": "sale"}}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error_of(&body),
        "Condition not met: state must be sale, found draft"
    );

    let (_, body) = send(
        &app,
        "GET",
        "/send_request?model=sale.order&Id=1",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(data_of(&body)[0]["state"], "draft");
}

#[tokio::test]
async fn test_put_with_relation_condition() {
    let app = build_app();
    let (status, body) = send_json(
        &app,
        "PUT",
        "/send_request?model=sale.order&Id=1",
        Some(USER_KEY),
        json!({
            "values": {"state": "sale"},
            "conditions": {"state": "draft", "partner_id": 1},
            "fields": ["state"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_of(&body), &vec![json!({"id": 1, "state": "sale"})]);
}

#[tokio::test]
async fn test_put_malformed_json() {
    let app = build_app();
    let (_, body) = send(
        &app,
        "PUT",
        "/send_request?model=res.partner&Id=1",
        Some(USER_KEY),
        Some("values=name"),
    )
    .await;
    assert!(error_of(&body).contains("Invalid JSON Data"));
}

// =============================================================================
// DELETE
// =============================================================================

#[tokio::test]
async fn test_delete_condition_mismatch_keeps_record() {
    let app = build_app();
    let (_, body) = send_json(
        &app,
        "DELETE",
        "/send_request?model=sale.order&Id=1",
        Some(USER_KEY),
        json!({"conditions": {"partner_id": 2}}),
    )
    .await;
    assert_eq!(
        error_of(&body),
        "Condition not met: partner_id must be 2, found 1"
    );

    let (status, _) = send(
        &app,
        "GET",
        "/send_request?model=sale.order&Id=1",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_returns_snapshot() {
    let app = build_app();
    let (status, body) = send_json(
        &app,
        "DELETE",
        "/send_request?model=sale.order&Id=1",
        Some(USER_KEY),
        json!({"conditions": {"partner_id": 1}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        data_of(&body),
        &vec![json!({"id": 1, "display_name": "S00001"})]
    );

    let (_, body) = send(
        &app,
        "GET",
        "/send_request?model=sale.order&Id=1",
        Some(USER_KEY),
        None,
    )
    .await;
    assert_eq!(error_of(&body), "Invalid JSON Data: Resource not found");
}
