use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;
use streetlight_api::models::LoginRequest;
use tower::ServiceExt;

mod common;
use common::mock_app::{ADMIN_PASSWORD, ADMIN_USERNAME, MockApp, read_json};

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/auth/login")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(
            serde_json::to_string(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .unwrap(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_login() {
    let app = MockApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(login_request(ADMIN_USERNAME, ADMIN_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["username"], json!(ADMIN_USERNAME));

    let token = body["token"].as_str().unwrap();
    let claims = app.token_service.retrieve_token_claims(token).unwrap().claims;
    assert_eq!(claims.sub, ADMIN_USERNAME);
    assert_eq!(body["expires_at"], json!(claims.exp));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = MockApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(login_request(ADMIN_USERNAME, "wrong_password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = read_json(response).await;
    assert_eq!(body["error"]["code"], json!(401));

    // The hint shown by older dashboards is not an account.
    let response = app
        .router
        .clone()
        .oneshot(login_request("admin@streetlight.com", ADMIN_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_current_session() {
    let app = MockApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(Method::GET, "/api/auth/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["username"], json!(ADMIN_USERNAME));
    assert!(body["expires_at"].as_u64().unwrap() > body["issued_at"].as_u64().unwrap());
}

#[tokio::test]
async fn test_routes_require_session() {
    let app = MockApp::new().await.with_fleet().await;

    for uri in [
        "/api/auth/me",
        "/api/streetlights",
        "/api/streetlights/lamp-01",
        "/api/overview",
        "/api/analytics",
        "/api/settings/refresh",
        "/api/settings/connection",
        "/api/events",
    ] {
        let request = Request::builder()
            .uri(uri)
            .method(Method::GET)
            .body(Body::empty())
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let request = Request::builder()
        .uri("/api/streetlights")
        .method(Method::GET)
        .header("Authorization", "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_commands_require_session() {
    let app = MockApp::new().await.with_fleet().await;

    let request = Request::builder()
        .uri("/api/streetlights/lamp-01/mode")
        .method(Method::PUT)
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "mode": "manual" }).to_string()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.storage.writes().await.is_empty());
}

#[tokio::test]
async fn test_login_rejects_malformed_body() {
    let app = MockApp::new().await;

    let request = Request::builder()
        .uri("/api/auth/login")
        .method(Method::POST)
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "username": ADMIN_USERNAME }).to_string()))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_logins() {
    let app = MockApp::new().await;

    let attempts = (0..4).map(|i| {
        let router = app.router.clone();
        let password = if i % 2 == 0 { ADMIN_PASSWORD } else { "wrong_password" };
        tokio::spawn(router.oneshot(login_request(ADMIN_USERNAME, password)))
    });
    let attempts: Vec<_> = attempts.collect();

    for (i, attempt) in attempts.into_iter().enumerate() {
        let response = attempt.await.unwrap().unwrap();
        let expected = if i % 2 == 0 { StatusCode::OK } else { StatusCode::UNAUTHORIZED };
        assert_eq!(response.status(), expected);
    }
}
