// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 모든 통합 테스트에서 공통으로 사용하는 셋업 함수 제공
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let app = setup_test(CredentialMode::Token);
//     let (status, body) = app.post_json("/auth/signup", json!({...}), None).await;
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;
use auth_server::domains::oauth::models::OAuthProvider;
use auth_server::domains::oauth::services::ProviderClient;
use auth_server::shared::config::OAuthClientConfig;
use auth_server::shared::database::{MemoryRefreshTokenStore, MemoryUserDirectory};
use auth_server::shared::middleware::auth::SESSION_HEADER;
use auth_server::{create_router, AppConfig, AppState, CredentialMode};

// 테스트용 상수
pub const TEST_JWT_SECRET: &str = "integration-test-secret-key-32-bytes!!";
pub const TEST_PASSWORD: &str = "password123";
pub const ADMIN_USERNAME: &str = "rootadmin";
pub const ADMIN_PASSWORD: &str = "adminpass123";

/// Provider 호출을 흉내내는 클라이언트 (응답 속성을 테스트에서 지정)
pub struct StubProviderClient {
    attributes: Mutex<Value>,
}

impl StubProviderClient {
    pub fn new() -> Self {
        Self {
            attributes: Mutex::new(Value::Null),
        }
    }

    pub fn set_attributes(&self, attributes: Value) {
        *self.attributes.lock() = attributes;
    }
}

#[async_trait]
impl ProviderClient for StubProviderClient {
    async fn exchange_code(
        &self,
        _provider: OAuthProvider,
        _client: &OAuthClientConfig,
        code: &str,
    ) -> anyhow::Result<String> {
        if code == "bad-code" {
            anyhow::bail!("invalid_grant");
        }
        Ok(format!("provider-token-{}", code))
    }

    async fn fetch_user_info(&self, _provider: OAuthProvider, _access_token: &str) -> anyhow::Result<Value> {
        Ok(self.attributes.lock().clone())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<MemoryUserDirectory>,
    pub refresh_tokens: Arc<MemoryRefreshTokenStore>,
    pub provider: Arc<StubProviderClient>,
}

/// 테스트 설정 (Argon2 비용 최소화, Google 클라이언트 등록, 관리자 계정)
pub fn test_config(mode: CredentialMode) -> AppConfig {
    let mode = match mode {
        CredentialMode::Token => "token",
        CredentialMode::Session => "session",
    };
    let vars: HashMap<&str, &str> = HashMap::from([
        ("AUTH_MODE", mode),
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("PASSWORD_HASH_MEMORY_KIB", "1024"),
        ("PASSWORD_HASH_ITERATIONS", "1"),
        ("PASSWORD_HASH_PARALLELISM", "1"),
        ("OAUTH2_REDIRECT_URL", "http://localhost:3000/oauth2/redirect"),
        ("OAUTH2_GOOGLE_CLIENT_ID", "google-client-id"),
        ("OAUTH2_GOOGLE_CLIENT_SECRET", "google-client-secret"),
        ("ADMIN_USERNAME", ADMIN_USERNAME),
        ("ADMIN_PASSWORD", ADMIN_PASSWORD),
        ("ADMIN_EMAIL", "admin@example.com"),
    ]);

    AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).expect("test config")
}

/// 테스트 전 초기화
pub async fn setup_test(mode: CredentialMode) -> TestApp {
    let users = Arc::new(MemoryUserDirectory::new());
    let refresh_tokens = Arc::new(MemoryRefreshTokenStore::new());
    let provider = Arc::new(StubProviderClient::new());

    let state = AppState::with_collaborators(
        test_config(mode),
        users.clone(),
        refresh_tokens.clone(),
        provider.clone(),
    )
    .expect("Failed to initialize AppState");
    state.bootstrap_admin().await.expect("Failed to create admin");

    let router = create_router(state.clone()).with_state(state.clone());

    TestApp {
        router,
        state,
        users,
        refresh_tokens,
        provider,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

impl TestResponse {
    pub fn location(&self) -> url::Url {
        let location = self
            .headers
            .get(header::LOCATION)
            .expect("Location header")
            .to_str()
            .expect("Location is ascii");
        url::Url::parse(location).expect("Location is an absolute url")
    }
}

impl TestApp {
    /// 모드에 맞는 인증 헤더로 요청 전송
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>, credential: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(credential) = credential {
            builder = match self.state.config.credential_mode {
                CredentialMode::Token => builder.header(header::AUTHORIZATION, format!("Bearer {}", credential)),
                CredentialMode::Session => builder.header(SESSION_HEADER, credential),
            };
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self.router.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let raw = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();
        let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            raw,
        }
    }

    pub async fn post_json(&self, uri: &str, body: Value, credential: Option<&str>) -> TestResponse {
        self.send(Method::POST, uri, Some(body), credential).await
    }

    pub async fn get(&self, uri: &str, credential: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, None, credential).await
    }

    pub async fn signup(&self, username: &str, email: &str) -> TestResponse {
        self.post_json(
            "/auth/signup",
            json!({ "username": username, "password": TEST_PASSWORD, "email": email }),
            None,
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post_json("/auth/login", json!({ "username": username, "password": password }), None)
            .await
    }

    /// 로그인 후 요청에 쓸 인증 수단 반환 (access token 또는 session id)
    pub async fn login_credential(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        let key = match self.state.config.credential_mode {
            CredentialMode::Token => "accessToken",
            CredentialMode::Session => "sessionId",
        };
        response.body[key].as_str().expect("credential in login response").to_string()
    }
}
