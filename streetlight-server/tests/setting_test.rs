use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::mock_app::{MockApp, read_json};

#[tokio::test]
async fn test_refresh_settings() {
    let app = MockApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(Method::GET, "/api/settings/refresh", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(
        body,
        json!({ "interval": 10, "min_interval": 5, "max_interval": 60, "cache_ttl": 5 })
    );
}

#[tokio::test]
async fn test_update_refresh_interval() {
    let app = MockApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::PUT,
            "/api/settings/refresh",
            Some(json!({ "interval": 30 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["interval"], json!(30));
    assert_eq!(app.refresh_service.interval().as_secs(), 30);

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::PUT,
            "/api/settings/refresh",
            Some(json!({ "interval": 1 })),
        ))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["interval"], json!(5));

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::PUT,
            "/api/settings/refresh",
            Some(json!({ "interval": 600 })),
        ))
        .await
        .unwrap();
    assert_eq!(read_json(response).await["interval"], json!(60));

    let response = app
        .router
        .clone()
        .oneshot(app.request(
            Method::PUT,
            "/api/settings/refresh",
            Some(json!({ "interval": "fast" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.refresh_service.interval().as_secs(), 60);
}

#[tokio::test]
async fn test_connection_probe() {
    let app = MockApp::new().await.with_fleet().await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(Method::GET, "/api/settings/connection", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["connected"], json!(true));
    assert_eq!(body["endpoint"], json!("memory://"));

    app.storage.set_offline(true);

    let response = app
        .router
        .clone()
        .oneshot(app.request(Method::GET, "/api/settings/connection", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["connected"], json!(false));
}

#[tokio::test]
async fn test_openapi_document() {
    let app = MockApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(app.request(Method::GET, "/api/docs/openapi.json", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert!(body["paths"]["/api/streetlights/{streetlight_id}/manual"]["put"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}
