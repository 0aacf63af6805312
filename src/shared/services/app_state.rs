use std::sync::Arc;
use anyhow::{Context, Result};
use crate::shared::config::AppConfig;
use crate::shared::database::{MemoryRefreshTokenStore, MemoryUserDirectory, RefreshTokenStore, UserDirectory};
use crate::domains::auth::services::state::AuthState;
use crate::domains::auth::services::RefreshTokenCleanupScheduler;
use crate::domains::oauth::services::state::OAuthState;
use crate::domains::oauth::services::{HttpProviderClient, ProviderClient};

/// 만료된 Refresh Token 정리 주기
const REFRESH_TOKEN_CLEANUP_PERIOD: std::time::Duration = std::time::Duration::from_secs(3600);

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_state: AuthState,
    pub oauth_state: OAuthState,
    /// Refresh Token 정리 스케줄러
    pub refresh_token_cleanup: RefreshTokenCleanupScheduler,
}

impl AppState {
    /// Create AppState with in-memory stores and the HTTP provider client
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(config: AppConfig) -> Result<Self> {
        let provider_client = HttpProviderClient::new(config.oauth.request_timeout)?;

        Self::with_collaborators(
            config,
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(MemoryRefreshTokenStore::new()),
            Arc::new(provider_client),
        )
    }

    /// 외부 협력자(저장소 / Provider 클라이언트)를 주입해서 생성
    pub fn with_collaborators(
        config: AppConfig,
        users: Arc<dyn UserDirectory>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        provider_client: Arc<dyn ProviderClient>,
    ) -> Result<Self> {
        // 1. 인증 도메인
        let auth_state = AuthState::new(&config, users, refresh_tokens.clone())
            .context("Failed to initialize auth state")?;

        // 2. OAuth2 도메인 (로컬 로그인과 같은 AuthService 로 인증 수단 발급)
        let oauth_state = OAuthState::new(
            config.oauth.clone(),
            provider_client,
            auth_state.auth_service.clone(),
        );

        let refresh_token_cleanup =
            RefreshTokenCleanupScheduler::new(refresh_tokens, REFRESH_TOKEN_CLEANUP_PERIOD);

        // 3. AppState 조합
        Ok(Self {
            config: Arc::new(config),
            auth_state,
            oauth_state,
            refresh_token_cleanup,
        })
    }

    /// 관리자 계정 생성 (설정된 경우)
    pub async fn bootstrap_admin(&self) -> Result<()> {
        let Some(admin) = &self.config.admin else {
            return Ok(());
        };

        self.auth_state
            .auth_service
            .ensure_admin(&admin.username, &admin.password, &admin.email)
            .await
            .context("Failed to create bootstrap admin")?;
        Ok(())
    }
}
