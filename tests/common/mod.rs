#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use project2_api::auth::{generate_jwt, hash_password, Claims};
use project2_api::config::AppConfig;
use project2_api::database::models::{NewUser, User};
use project2_api::database::{MemoryStorage, UserStore};
use project2_api::media::{MediaError, MediaHost, UploadedFile};
use project2_api::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const FAKE_MEDIA_BASE: &str = "https://res.cloudinary.com/demo/image/upload/project2";

/// Media host that "stores" nothing and answers with a predictable URL
pub struct FakeMediaHost;

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, file: UploadedFile) -> Result<String, MediaError> {
        Ok(format!("{}/{}", FAKE_MEDIA_BASE, file.file_name))
    }
}

/// Media host that always fails, as Cloudinary does without credentials
pub struct BrokenMediaHost;

#[async_trait]
impl MediaHost for BrokenMediaHost {
    async fn upload(&self, _file: UploadedFile) -> Result<String, MediaError> {
        Err(MediaError::NotConfigured)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.password_hash_cost = 4;
    config.api.enable_request_logging = false;
    config
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// Router over an in-memory store, driven in-process
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStorage>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(test_config(), Arc::new(FakeMediaHost))
    }

    pub fn with(config: AppConfig, media: Arc<dyn MediaHost>) -> Self {
        let store = Arc::new(MemoryStorage::new());
        let state = AppState::new(config.clone(), store.clone(), media);
        Self {
            router: project2_api::app(state),
            store,
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?
        };
        Ok(TestResponse { status, headers, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(builder(Method::GET, uri, token).body(Body::empty())?).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(builder(Method::DELETE, uri, token).body(Body::empty())?).await
    }

    pub async fn json(&self, method: Method, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.raw(method, uri, token, "application/json", body.to_string()).await
    }

    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        content_type: &str,
        body: impl Into<Body>,
    ) -> Result<TestResponse> {
        let request = builder(method, uri, token)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())?;
        self.send(request).await
    }

    /// Stores a user directly and returns it with a valid bearer token
    pub async fn user(&self, email: &str, username: &str, password: &str) -> Result<(User, String)> {
        let password_hash = hash_password(password.to_string(), self.config.security.password_hash_cost).await?;
        let user = self
            .store
            .create_user(NewUser {
                email: email.to_string(),
                username: username.to_string(),
                password_hash,
            })
            .await?
            .context("store returned no user")?;
        let token = self.token_for(&user)?;
        Ok((user, token))
    }

    pub fn token_for(&self, user: &User) -> Result<String> {
        let claims = Claims::new(user, self.config.security.jwt_expiry_hours);
        Ok(generate_jwt(&claims, &self.config.security)?)
    }

    pub async fn project(&self, token: &str, title: &str, description: &str) -> Result<String> {
        let res = self
            .json(
                Method::POST,
                "/api/v1/projects",
                Some(token),
                serde_json::json!({ "title": title, "description": description }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create failed: {}", res.body);
        res.data()["_id"]
            .as_str()
            .map(str::to_string)
            .context("created project has no _id")
    }
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}
