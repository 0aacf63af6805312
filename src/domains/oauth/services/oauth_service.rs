use std::sync::Arc;
use url::Url;
use crate::domains::auth::models::{IssuedCredential, NewUser, User};
use crate::domains::auth::services::AuthService;
use crate::domains::oauth::models::{OAuth2UserInfo, OAuthCallbackQuery, OAuthProvider};
use crate::domains::oauth::services::{OAuthStateStore, ProviderClient};
use crate::shared::config::{OAuthClientConfig, OAuthConfig};
use crate::shared::database::DirectoryError;
use crate::shared::errors::AuthError;

// OAuth2 로그인 서비스
// 역할: Provider 인가 → 사용자 조회/생성 → 우리 인증 수단 발급
//
// 처리 흐름:
// 1. /oauth2/authorization/{provider} → Provider 인가 페이지로 리다이렉트 (state 발급)
// 2. Provider 가 /login/oauth2/code/{provider}?code&state 로 콜백
// 3. code → Provider Access Token → 사용자 속성
// 4. (provider, externalId) 로 사용자 조회, 없으면 생성 (role = USER)
// 5. 로컬 로그인과 같은 방식으로 인증 수단 발급 후 프론트엔드로 리다이렉트
#[derive(Clone)]
pub struct OAuthService {
    config: OAuthConfig,
    states: Arc<OAuthStateStore>,
    client: Arc<dyn ProviderClient>,
    auth_service: AuthService,
}

impl OAuthService {
    pub fn new(
        config: OAuthConfig,
        states: Arc<OAuthStateStore>,
        client: Arc<dyn ProviderClient>,
        auth_service: AuthService,
    ) -> Self {
        Self {
            config,
            states,
            client,
            auth_service,
        }
    }

    /// 설정된 Provider 만 허용
    fn registration(&self, registration_id: &str) -> Result<(OAuthProvider, &OAuthClientConfig), AuthError> {
        let provider = OAuthProvider::from_registration_id(registration_id)?;
        let client = self
            .config
            .client(provider)
            .ok_or_else(|| AuthError::UnsupportedProvider(registration_id.to_string()))?;
        Ok((provider, client))
    }

    /// Provider 인가 페이지 URL 생성
    pub fn authorization_url(&self, registration_id: &str) -> Result<Url, AuthError> {
        let (provider, client) = self.registration(registration_id)?;

        let mut url = Url::parse(provider.authorization_uri())
            .map_err(|e| AuthError::Internal(format!("Invalid authorization uri: {}", e)))?;
        let state = self.states.issue(provider);
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &client.client_id)
            .append_pair("redirect_uri", &client.redirect_uri)
            .append_pair("scope", &provider.default_scopes().join(" "))
            .append_pair("state", &state);

        Ok(url)
    }

    /// Provider 콜백 처리
    /// Returns the frontend URL carrying the issued credential
    pub async fn handle_callback(
        &self,
        registration_id: &str,
        query: OAuthCallbackQuery,
    ) -> Result<Url, AuthError> {
        let (provider, client) = self.registration(registration_id)?;

        // 1. state 검증 (한 번만 사용)
        let state_ok = query
            .state
            .as_deref()
            .is_some_and(|state| self.states.consume(state, provider));
        if !state_ok {
            tracing::warn!(%provider, "[OAuth2] invalid or expired state");
            return Err(AuthError::OAuthStateInvalid);
        }

        if let Some(error) = query.error {
            tracing::info!(%provider, %error, "[OAuth2] authorization denied by user or provider");
            return Err(AuthError::OAuthAuthorizationDenied(error));
        }
        let code = query
            .code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuthError::ValidationFailed("Missing authorization code".to_string()))?;

        // 2. code → Access Token → 사용자 속성
        let provider_token = self
            .client
            .exchange_code(provider, client, &code)
            .await
            .map_err(|e| provider_failure(provider, e))?;
        let attributes = self
            .client
            .fetch_user_info(provider, &provider_token)
            .await
            .map_err(|e| provider_failure(provider, e))?;

        // 3. 사용자 조회 / 생성
        let user = self.provision(provider, provider.user_info(attributes)).await?;

        // 4. 인증 수단 발급
        let credential = self.auth_service.issue_for(&user).await?;
        tracing::info!(user_id = user.id, %provider, "[OAuth2] login succeeded");

        Ok(self.success_redirect(&credential))
    }

    /// Provider 사용자 → 우리 사용자
    ///
    /// 같은 (provider, externalId) 는 항상 같은 사용자로 연결됩니다.
    /// 기존 사용자는 수정하지 않습니다.
    pub async fn provision(
        &self,
        provider: OAuthProvider,
        info: Box<dyn OAuth2UserInfo + Send>,
    ) -> Result<User, AuthError> {
        let external_id = info
            .provider_id()
            .ok_or(AuthError::ProviderAttributeMissing("externalId"))?;
        let email = info.email();
        drop(info);

        let users = self.auth_service.users();
        let auth_provider = provider.auth_provider();

        if let Some(existing) = users
            .find_by_provider_and_external_id(auth_provider, &external_id)
            .await?
        {
            return Ok(existing);
        }

        // 신규 사용자: 이메일 필수
        let email = email.ok_or(AuthError::ProviderAttributeMissing("email"))?;
        let new_user = NewUser::external(auth_provider, external_id.clone(), email)
            .ok_or_else(|| AuthError::UnsupportedProvider(auth_provider.to_string()))?;

        match users.save(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, %provider, "[OAuth2] user provisioned");
                Ok(user)
            }
            // 동시에 같은 계정으로 콜백된 경우: 먼저 저장된 사용자 사용
            Err(DirectoryError::ExternalIdTaken) => users
                .find_by_provider_and_external_id(auth_provider, &external_id)
                .await?
                .ok_or_else(|| AuthError::DatabaseError("linked user disappeared".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// 프론트엔드 리다이렉트 URL (인증 수단을 쿼리로 전달)
    pub fn success_redirect(&self, credential: &IssuedCredential) -> Url {
        let mut url = self.config.redirect_url.clone();
        url.query_pairs_mut().extend_pairs(credential.query_pairs());
        url
    }
}

fn provider_failure(provider: OAuthProvider, err: anyhow::Error) -> AuthError {
    let detail = format!("{:#}", err);
    tracing::error!(%provider, error = %detail, "[OAuth2] provider request failed");
    AuthError::ProviderRequestFailed(provider.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use crate::domains::auth::models::{AuthProvider, Role};
    use crate::domains::auth::services::{CredentialIssuer, SessionStore};
    use crate::shared::config::PasswordHashConfig;
    use crate::shared::database::MemoryUserDirectory;
    use crate::shared::utils::PasswordEncoder;

    struct StubClient {
        attributes: Value,
    }

    #[async_trait]
    impl ProviderClient for StubClient {
        async fn exchange_code(&self, _: OAuthProvider, _: &OAuthClientConfig, code: &str) -> anyhow::Result<String> {
            Ok(format!("token-for-{}", code))
        }

        async fn fetch_user_info(&self, _: OAuthProvider, _: &str) -> anyhow::Result<Value> {
            Ok(self.attributes.clone())
        }
    }

    fn service(attributes: Value) -> OAuthService {
        let mut clients = HashMap::new();
        clients.insert(
            OAuthProvider::Google,
            OAuthClientConfig {
                client_id: "google-client".to_string(),
                client_secret: "google-secret".to_string(),
                redirect_uri: "http://localhost:3002/login/oauth2/code/google".to_string(),
            },
        );
        let config = OAuthConfig {
            redirect_url: Url::parse("http://localhost:3000/oauth2/redirect").unwrap(),
            clients,
            request_timeout: Duration::from_secs(5),
        };
        let encoder = PasswordEncoder::new(PasswordHashConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        let auth_service = AuthService::new(
            Arc::new(MemoryUserDirectory::new()),
            encoder,
            CredentialIssuer::Session {
                sessions: Arc::new(SessionStore::new()),
            },
        );

        OAuthService::new(
            config,
            Arc::new(OAuthStateStore::default()),
            Arc::new(StubClient { attributes }),
            auth_service,
        )
    }

    fn google(attributes: Value) -> Box<dyn OAuth2UserInfo + Send> {
        OAuthProvider::Google.user_info(attributes)
    }

    #[tokio::test]
    async fn test_provision_twice_same_user() {
        let attributes = json!({ "sub": "g-123", "email": "g@example.com", "name": "G" });
        let service = service(attributes.clone());

        let first = service.provision(OAuthProvider::Google, google(attributes.clone())).await.unwrap();
        let second = service.provision(OAuthProvider::Google, google(attributes)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.role, Role::User);
        assert_eq!(first.provider, AuthProvider::Google);
        assert_eq!(first.username, None);
    }

    #[tokio::test]
    async fn test_provision_missing_attributes() {
        let service = service(Value::Null);

        let err = service
            .provision(OAuthProvider::Google, google(json!({ "email": "g@example.com" })))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ProviderAttributeMissing("externalId")));

        let err = service
            .provision(OAuthProvider::Google, google(json!({ "sub": "g-1" })))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::ProviderAttributeMissing("email")));
    }

    #[test]
    fn test_authorization_url_and_unconfigured_provider() {
        let service = service(Value::Null);
        let url = service.authorization_url("google").unwrap();
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        assert_eq!(query["client_id"], "google-client");
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["state"].len(), 32);

        assert!(matches!(service.authorization_url("kakao"), Err(AuthError::UnsupportedProvider(_))));
        assert!(matches!(service.authorization_url("local"), Err(AuthError::UnsupportedProvider(_))));
    }

    #[tokio::test]
    async fn test_callback_issues_session_and_state_is_single_use() {
        let service = service(json!({ "sub": "g-9", "email": "nine@example.com" }));
        let url = service.authorization_url("google").unwrap();
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let query = || OAuthCallbackQuery {
            code: Some("abc".to_string()),
            state: Some(state.clone()),
            error: None,
        };

        let redirect = service.handle_callback("google", query()).await.unwrap();
        assert!(redirect.as_str().starts_with("http://localhost:3000/oauth2/redirect?sessionId="));

        let err = service.handle_callback("google", query()).await.unwrap_err();
        assert!(matches!(err, AuthError::OAuthStateInvalid));
    }

    #[tokio::test]
    async fn test_declined_consent_is_denied_not_provider_failure() {
        let service = service(json!({ "sub": "g-9", "email": "nine@example.com" }));
        let url = service.authorization_url("google").unwrap();
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();

        let err = service
            .handle_callback(
                "google",
                OAuthCallbackQuery {
                    code: None,
                    state: Some(state),
                    error: Some("access_denied".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::OAuthAuthorizationDenied(ref e) if e == "access_denied"));
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
