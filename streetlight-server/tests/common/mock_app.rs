#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use serde_json::{Value, json};
use streetlight_server::app::create_app;
use streetlight_server::configs::{
    Account, Auth, Database, Logger, MemoryStorage, Refresh, Server, Settings,
};
use streetlight_server::services::{Argon2Credentials, RefreshService, TokenService};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct MockApp {
    pub router: Router,
    pub storage: Arc<MemoryStorage>,
    pub refresh_service: Arc<RefreshService>,
    pub token_service: Arc<TokenService>,
    pub token: String,
}

impl MockApp {
    pub async fn new() -> Self {
        let auth = Auth {
            secret: String::from("test"),
            expiration: 1000,
            users: vec![Account {
                username: ADMIN_USERNAME.to_string(),
                password: Argon2Credentials::hash(ADMIN_PASSWORD).unwrap(),
            }],
        };

        let settings = Arc::new(Settings {
            server: Server {
                host: String::from("127.0.0.1"),
                port: 0,
            },
            logger: Logger {
                level: String::from("debug"),
            },
            database: Database {
                url: String::from("memory://"),
                collection: String::from("streetlights"),
                credential: None,
                timeout: 1,
            },
            refresh: Refresh {
                interval: 10,
                cache_ttl: 5,
            },
            auth: auth.clone(),
        });

        let storage = Arc::new(MemoryStorage::new());
        let app = create_app(&settings, storage.clone()).unwrap();

        let token_service = Arc::new(TokenService::new(&auth));
        let token = token_service.generate_token(ADMIN_USERNAME).unwrap().token;

        Self {
            router: app.router,
            storage,
            refresh_service: app.refresh_service,
            token_service,
            token,
        }
    }

    /// Replaces the device collection and publishes it as the current snapshot.
    pub async fn with_streetlights(self, streetlights: Value) -> Self {
        self.storage.seed("streetlights", streetlights).await;
        self.refresh_service.force_refresh().await.unwrap();
        self
    }

    pub async fn with_fleet(self) -> Self {
        self.with_streetlights(fleet()).await
    }

    pub fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .uri(uri)
            .method(method)
            .header("Authorization", format!("Bearer {}", self.token));

        match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    serde_json::from_slice(&body).unwrap()
}

/// Ten lights: six on, four off, three offline, three in manual mode.
pub fn fleet() -> Value {
    json!({
        "lamp-01": { "status": "on",  "mode": "automatic", "isDark": true,  "motionDetected": true,  "online": true,  "timestamp": 1000, "lastUpdate": "2024-05-01T20:00:00Z" },
        "lamp-02": { "status": "on",  "mode": "automatic", "isDark": true,  "motionDetected": false, "online": true,  "timestamp": 2000 },
        "lamp-03": { "status": "on",  "mode": "manual",    "isDark": true,  "motionDetected": false, "online": true,  "timestamp": 3000, "manualState": true },
        "lamp-04": { "status": "on",  "mode": "automatic", "isDark": true,  "motionDetected": true,  "online": false, "timestamp": 4000 },
        "lamp-05": { "status": "on",  "mode": "manual",    "isDark": false, "motionDetected": false, "online": true,  "timestamp": 5000, "manualState": true },
        "lamp-06": { "status": "on",  "mode": "automatic", "isDark": true,  "motionDetected": false, "online": false, "timestamp": 6000 },
        "lamp-07": { "status": "off", "mode": "automatic", "isDark": false, "motionDetected": false, "online": true,  "timestamp": 7000 },
        "lamp-08": { "status": "off", "mode": "automatic", "isDark": false, "motionDetected": false, "online": true,  "timestamp": 8000 },
        "lamp-09": { "status": "off", "mode": "manual",    "isDark": false, "motionDetected": false, "online": false, "timestamp": 9000, "manualState": false },
        "lamp-10": { "status": "off", "mode": "automatic", "isDark": true,  "motionDetected": false, "online": true,  "timestamp": 10000 }
    })
}
