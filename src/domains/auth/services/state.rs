// Auth domain state
// 인증 도메인 상태
use std::sync::Arc;
use crate::shared::config::{AppConfig, CredentialMode};
use crate::shared::database::{RefreshTokenStore, UserDirectory};
use crate::shared::errors::AuthError;
use crate::shared::utils::PasswordEncoder;
use crate::domains::auth::services::{AuthService, CredentialIssuer, JwtService, SessionStore};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    /// 세션 모드에서만 존재
    pub sessions: Option<Arc<SessionStore>>,
}

impl AuthState {
    /// Create AuthState for the configured credential mode
    /// 설정된 인증 방식에 맞춰 AuthState 생성
    pub fn new(
        config: &AppConfig,
        users: Arc<dyn UserDirectory>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Result<Self, AuthError> {
        let password_encoder = PasswordEncoder::new(config.password_hash)?;

        let (issuer, sessions) = match config.credential_mode {
            CredentialMode::Token => (
                CredentialIssuer::Token {
                    jwt_service: JwtService::new(&config.jwt.secret, config.jwt.access_token_ttl),
                    refresh_tokens,
                    refresh_token_ttl: config.jwt.refresh_token_ttl,
                },
                None,
            ),
            CredentialMode::Session => {
                let sessions = Arc::new(SessionStore::new());
                (
                    CredentialIssuer::Session {
                        sessions: sessions.clone(),
                    },
                    Some(sessions),
                )
            }
        };

        Ok(Self {
            auth_service: AuthService::new(users, password_encoder, issuer),
            sessions,
        })
    }
}
