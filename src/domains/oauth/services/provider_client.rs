use std::time::Duration;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use crate::domains::oauth::models::OAuthProvider;
use crate::shared::config::OAuthClientConfig;

/// OAuth2 Provider 와의 HTTP 통신 규약
/// Code exchange and user-info retrieval against a provider
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Authorization Code → Provider Access Token
    async fn exchange_code(
        &self,
        provider: OAuthProvider,
        client: &OAuthClientConfig,
        code: &str,
    ) -> Result<String>;

    /// Provider Access Token → 원본 사용자 속성
    async fn fetch_user_info(&self, provider: OAuthProvider, access_token: &str) -> Result<Value>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

// OAuth2 HTTP 클라이언트
// 역할: token / userinfo 엔드포인트 호출
pub struct HttpProviderClient {
    http_client: reqwest::Client,
}

impl HttpProviderClient {
    // 클라이언트 생성 (요청 타임아웃 적용)
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent("auth-server/1.0") // GitHub API 는 User-Agent 필수
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http_client })
    }

    async fn get_json(&self, url: &str, access_token: &str) -> Result<Value> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        // HTTP 상태 코드 확인
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} returned error: {} - {}", url, status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    // GitHub 은 공개 이메일이 없으면 /user 응답의 email 이 null
    async fn github_primary_email(&self, access_token: &str) -> Result<Option<String>> {
        let emails: Vec<GithubEmail> = serde_json::from_value(
            self.get_json("https://api.github.com/user/emails", access_token).await?,
        )
        .context("Failed to parse GitHub email list")?;

        Ok(emails
            .into_iter()
            .find(|e| e.primary && e.verified)
            .map(|e| e.email))
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn exchange_code(
        &self,
        provider: OAuthProvider,
        client: &OAuthClientConfig,
        code: &str,
    ) -> Result<String> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", client.redirect_uri.as_str()),
        ];

        let response = self
            .http_client
            .post(provider.token_uri())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .with_context(|| format!("Failed to send token request to {}", provider))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} token endpoint returned error: {} - {}", provider, status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} token response", provider))?;

        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, provider: OAuthProvider, access_token: &str) -> Result<Value> {
        let mut attributes = self.get_json(provider.user_info_uri(), access_token).await?;

        if provider == OAuthProvider::Github && attributes.get("email").is_none_or(Value::is_null) {
            if let Some(email) = self.github_primary_email(access_token).await? {
                if let Some(object) = attributes.as_object_mut() {
                    object.insert("email".to_string(), Value::String(email));
                }
            }
        }

        Ok(attributes)
    }
}
