#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use staffdesk::{
    db::{self, DatabaseConfig},
    middleware::rate_limit::{LoginLimit, create_login_config},
    routes::create_routes,
    state::AppState,
    utils::jwt::JwtConfig,
};
use tower::ServiceExt;

pub const SECRET: &str = "test-secret-test-secret-test-secret!";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
        ttl: chrono::Duration::minutes(30),
        issuer: "staffdesk".to_string(),
    }
}

/// A fresh app on its own in-memory database.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_limit(LoginLimit {
        burst: 50,
        period_secs: 1,
        ..LoginLimit::default()
    })
    .await
}

pub async fn spawn_app_with_limit(limit: LoginLimit) -> TestApp {
    let db = db::connect(&DatabaseConfig::in_memory()).await.unwrap();
    let state = AppState::new(db, &jwt_config());
    let router = create_routes(state.clone(), create_login_config(limit).unwrap());
    TestApp { router, state }
}

impl TestApp {
    /// Sends a request and returns the status and the JSON body (`Null` if not JSON).
    pub async fn send(
        &self,
        method: Method,
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

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn register(&self, username: &str, password: &str, role: Option<&str>) -> (StatusCode, Value) {
        let mut body = json!({ "username": username, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        self.send(Method::POST, "/auth/register", None, Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let body = json!({ "username": username, "password": password });
        self.send(Method::POST, "/auth/login", None, Some(body)).await
    }

    /// Registers and logs in, returning the token.
    pub async fn token_for(&self, username: &str, password: &str, role: Option<&str>) -> String {
        let (status, _) = self.register(username, password, role).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn user_token(&self) -> String {
        self.token_for("alice", "pw1", None).await
    }

    pub async fn admin_token(&self) -> String {
        self.token_for("admin", "admin123", Some("admin")).await
    }
}
