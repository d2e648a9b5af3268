use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tower::ServiceExt;

async fn test_app() -> Router {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("sqlite options")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory sqlite");
    swapskillz::db::migrations::run_migrations(&pool)
        .await
        .expect("migrations");
    swapskillz::app::create_router(pool)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Registers a user and returns (bearer token, user id).
async fn register(app: &Router, name: &str, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "secret123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

async fn create_request(app: &Router, sender_token: &str, receiver_id: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/requests",
        Some(sender_token),
        Some(json!({
            "receiverId": receiver_id,
            "skillOffered": "Guitar",
            "skillWanted": "Spanish",
        })),
    )
    .await
}

#[tokio::test]
async fn root_and_health() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "SwapSkillz API is running!");

    let (status, _) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_login_me_round_trip() {
    let app = test_app().await;
    let (token, user_id) = register(&app, "Ana", "ana@example.com").await;

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], Value::String(user_id));
    assert_eq!(body["user"]["email"], "ana@example.com");

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "Ana@Example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert!(body["token"].as_str().is_some());

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": "ana@example.com", "password": "wrong-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn register_validates_fields() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "A", "email": "not-an-email", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn duplicate_registration_rejected() {
    let app = test_app().await;
    register(&app, "Ana", "ana@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"name": "Ana Again", "email": "ana@example.com", "password": "secret123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn private_routes_require_bearer_token() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/requests", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/auth/me", Some("bogus-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_swap_lifecycle() {
    let app = test_app().await;
    let (a_token, _a_id) = register(&app, "Ana", "ana@example.com").await;
    let (b_token, b_id) = register(&app, "Ben", "ben@example.com").await;
    let (c_token, _c_id) = register(&app, "Cam", "cam@example.com").await;

    // A -> B: Guitar for Spanish.
    let (status, body) = create_request(&app, &a_token, &b_id).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    assert_eq!(body["request"]["status"], "pending");
    assert_eq!(body["request"]["skillOffered"], "Guitar");
    assert!(body["request"]["respondedAt"].is_null());
    assert_eq!(body["request"]["sender"]["name"], "Ana");
    assert_eq!(body["request"]["receiver"]["name"], "Ben");
    let request_id = body["request"]["id"].as_str().unwrap().to_string();

    // Both parties can fetch it directly; a third party cannot.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/requests/{request_id}"),
        Some(&b_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["id"], Value::String(request_id.clone()));

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/requests/{request_id}"),
        Some(&c_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only the receiver may accept.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/accept"),
        Some(&a_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Completing before acceptance is not legal.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/complete"),
        Some(&a_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_state");

    // B accepts.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/accept"),
        Some(&b_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["status"], "accepted");
    assert!(body["request"]["respondedAt"].is_string());

    // Accepting twice is invalid, not silently repeated.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/accept"),
        Some(&b_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_state");

    // Either party may complete; A does.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/complete"),
        Some(&a_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["status"], "completed");

    // A reviews B now that the swap completed.
    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&a_token),
        Some(json!({"requestId": request_id, "rating": 5, "comment": "great teacher"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "review failed: {body}");
    assert_eq!(body["review"]["reviewedUserId"], Value::String(b_id.clone()));

    let (status, body) = send(&app, "GET", &format!("/api/reviews/{b_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["reviews"][0]["reviewer"]["name"], "Ana");

    // Only the sender can delete; then the record is gone for both parties.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/requests/{request_id}"),
        Some(&b_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/requests/{request_id}"),
        Some(&a_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Request cancelled successfully");

    for token in [&a_token, &b_token] {
        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/requests/{request_id}"),
            Some(token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, "GET", "/api/requests", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0, "deleted request still listed: {body}");
    }
}

#[tokio::test]
async fn cannot_request_yourself() {
    let app = test_app().await;
    let (token, user_id) = register(&app, "Ana", "ana@example.com").await;

    let (status, body) = create_request(&app, &token, &user_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_operation");
    assert_eq!(body["message"], "Cannot send request to yourself");
}

#[tokio::test]
async fn duplicate_pending_request_conflicts() {
    let app = test_app().await;
    let (a_token, _) = register(&app, "Ana", "ana@example.com").await;
    let (b_token, b_id) = register(&app, "Ben", "ben@example.com").await;

    let (status, body) = create_request(&app, &a_token, &b_id).await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = body["request"]["id"].as_str().unwrap().to_string();

    // Second create before B responds.
    let (status, body) = create_request(&app, &a_token, &b_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");
    assert_eq!(
        body["message"],
        "You already have a pending request with this user"
    );

    // Once declined, a fresh request to the same receiver is fine.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/decline"),
        Some(&b_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = create_request(&app, &a_token, &b_id).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn declined_request_stays_declined() {
    let app = test_app().await;
    let (a_token, _) = register(&app, "Ana", "ana@example.com").await;
    let (b_token, b_id) = register(&app, "Ben", "ben@example.com").await;

    let (_, body) = create_request(&app, &a_token, &b_id).await;
    let request_id = body["request"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/decline"),
        Some(&b_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["status"], "declined");
    assert!(body["request"]["respondedAt"].is_string());

    // No acceptance after decline, and no completion either.
    for action in ["accept", "complete"] {
        let token = if action == "accept" { &b_token } else { &a_token };
        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/requests/{request_id}/{action}"),
            Some(token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{action}: {body}");
        assert_eq!(body["error"], "invalid_state");
    }
}

#[tokio::test]
async fn list_filters_by_direction() {
    let app = test_app().await;
    let (a_token, a_id) = register(&app, "Ana", "ana@example.com").await;
    let (b_token, b_id) = register(&app, "Ben", "ben@example.com").await;

    create_request(&app, &a_token, &b_id).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    create_request(&app, &b_token, &a_id).await;

    let (status, body) = send(&app, "GET", "/api/requests?type=sent", Some(&a_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["requests"][0]["senderId"], Value::String(a_id.clone()));

    let (_, body) = send(
        &app,
        "GET",
        "/api/requests?type=received",
        Some(&a_token),
        None,
    )
    .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["requests"][0]["receiverId"], Value::String(a_id.clone()));

    // Default is both, newest first.
    let (_, body) = send(&app, "GET", "/api/requests", Some(&a_token), None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["requests"][0]["senderId"], Value::String(b_id.clone()));
    assert_eq!(body["requests"][1]["senderId"], Value::String(a_id.clone()));
}

#[tokio::test]
async fn requesting_unknown_receiver_is_not_found() {
    let app = test_app().await;
    let (token, _) = register(&app, "Ana", "ana@example.com").await;

    let (status, body) = create_request(&app, &token, "no-such-user").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn review_requires_completed_swap_and_party() {
    let app = test_app().await;
    let (a_token, _) = register(&app, "Ana", "ana@example.com").await;
    let (b_token, b_id) = register(&app, "Ben", "ben@example.com").await;
    let (c_token, _) = register(&app, "Cam", "cam@example.com").await;

    let (_, body) = create_request(&app, &a_token, &b_id).await;
    let request_id = body["request"]["id"].as_str().unwrap().to_string();

    // Not completed yet.
    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&a_token),
        Some(json!({"requestId": request_id, "rating": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_state");

    send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/accept"),
        Some(&b_token),
        None,
    )
    .await;
    send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}/complete"),
        Some(&b_token),
        None,
    )
    .await;

    // A stranger cannot review it.
    let (status, _) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&c_token),
        Some(json!({"requestId": request_id, "rating": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Rating is bounded.
    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&a_token),
        Some(json!({"requestId": request_id, "rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    // A valid review, then a duplicate.
    let (status, _) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&a_token),
        Some(json!({"requestId": request_id, "rating": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&a_token),
        Some(json!({"requestId": request_id, "rating": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");

    // The other party still gets their own review.
    let (status, _) = send(
        &app,
        "POST",
        "/api/reviews",
        Some(&b_token),
        Some(json!({"requestId": request_id, "rating": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn skill_catalog_create_search_delete() {
    let app = test_app().await;
    let (a_token, a_id) = register(&app, "Ana", "ana@example.com").await;
    let (b_token, _) = register(&app, "Ben", "ben@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/skills",
        Some(&a_token),
        Some(json!({
            "title": "Guitar lessons",
            "description": "Fingerstyle and chords for beginners",
            "category": "creative",
            "skillsWanted": ["Spanish"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "skill create failed: {body}");
    assert_eq!(body["skill"]["proficiency"], "Intermediate");
    assert_eq!(body["skill"]["owner"]["name"], "Ana");
    let skill_id = body["skill"]["id"].as_str().unwrap().to_string();

    // Empty title is a validation failure.
    let (status, body) = send(
        &app,
        "POST",
        "/api/skills",
        Some(&a_token),
        Some(json!({"title": "  ", "description": "x", "category": "other"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    // Public search.
    let (status, body) = send(&app, "GET", "/api/skills?q=guitar", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (_, body) = send(&app, "GET", "/api/skills?category=tech", None, None).await;
    assert_eq!(body["count"], 0);

    // Only the owner may delete.
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/skills/{skill_id}"),
        Some(&b_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/skills/{skill_id}"),
        Some(&a_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/skills/{skill_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Profile routes.
    let (status, body) = send(&app, "GET", &format!("/api/users/{a_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana");
    assert!(body["user"].get("email").is_none(), "email must stay private");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&a_token),
        Some(json!({"bio": "guitarist"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["bio"], "guitarist");
    assert_eq!(body["user"]["name"], "Ana");
}
