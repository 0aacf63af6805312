use std::sync::Arc;
use chrono::Utc;
use crate::shared::config::CredentialMode;
use crate::shared::database::{RefreshTokenStore, UserDirectory};
use crate::shared::errors::AuthError;
use crate::shared::utils::PasswordEncoder;
use crate::domains::auth::models::{
    Identity, IssuedCredential, LoginRequest, NewUser, RefreshTokenCreate, Role, SignupRequest, User,
};
use crate::domains::auth::services::{JwtService, SessionStore};

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 4..=20;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=100;

/// 인증 수단 발급기 (배포당 하나의 방식)
/// Credential backend; the deployment picks exactly one
#[derive(Clone)]
pub enum CredentialIssuer {
    /// JWT Access Token + 저장된 Refresh Token
    Token {
        jwt_service: JwtService,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        refresh_token_ttl: chrono::Duration,
    },
    /// 서버 메모리 세션
    Session { sessions: Arc<SessionStore> },
}

impl CredentialIssuer {
    pub fn mode(&self) -> CredentialMode {
        match self {
            CredentialIssuer::Token { .. } => CredentialMode::Token,
            CredentialIssuer::Session { .. } => CredentialMode::Session,
        }
    }
}

// 인증 서비스
// 역할: 회원가입 / 로그인 / 토큰 갱신 / 로그아웃
// AuthService: handles authentication business logic
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserDirectory>,
    password_encoder: PasswordEncoder,
    issuer: CredentialIssuer,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        password_encoder: PasswordEncoder,
        issuer: CredentialIssuer,
    ) -> Self {
        Self {
            users,
            password_encoder,
            issuer,
        }
    }

    pub fn mode(&self) -> CredentialMode {
        self.issuer.mode()
    }

    pub fn users(&self) -> &Arc<dyn UserDirectory> {
        &self.users
    }

    // 회원가입 (비즈니스 로직)
    pub async fn signup(&self, request: SignupRequest) -> Result<User, AuthError> {
        validate_signup(&request)?;

        // 1. 아이디 중복 확인 (이메일보다 먼저)
        if self.users.exists_by_username(&request.username).await? {
            return Err(AuthError::DuplicateUsername);
        }

        // 2. 이메일 중복 확인
        if self.users.exists_by_email(&request.email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        // 3. 비밀번호 해싱
        let password_hash = self.hash_password(request.password).await?;

        // 4. 사용자 생성 (USER / LOCAL), 동시 가입 경합은 저장소가 최종 판정
        let user = self
            .users
            .save(NewUser::local(request.username, password_hash, request.email))
            .await?;

        tracing::info!(user_id = user.id, "[Auth] signup completed");
        Ok(user)
    }

    // 로그인 (비즈니스 로직)
    // Returns: (User, 발급된 인증 수단)
    pub async fn login(&self, request: LoginRequest) -> Result<(User, IssuedCredential), AuthError> {
        // 1. 아이디로 사용자 조회
        let user = self.users.find_by_username(&request.username).await?;

        // 2. 비밀번호 검증
        // 없는 아이디도 같은 비용의 검증을 거치고 같은 에러를 반환
        let verified = match user.as_ref().and_then(|u| u.password_hash.clone()) {
            Some(hash) => self.verify_password(request.password, hash).await?,
            None => {
                self.burn_password(request.password).await?;
                false
            }
        };

        let user = match (user, verified) {
            (Some(user), true) => user,
            _ => {
                tracing::warn!(username = %request.username, "[Auth] login failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        // 3. 인증 수단 발급
        let credential = self.issue_for(&user).await?;

        tracing::info!(user_id = user.id, role = %user.role, "[Auth] login succeeded");
        Ok((user, credential))
    }

    /// 인증 수단 발급 (로컬 로그인 / OAuth2 공용)
    /// Issue a credential for a known user. Provider-sourced users have no
    /// username, so their email is the display name.
    pub async fn issue_for(&self, user: &User) -> Result<IssuedCredential, AuthError> {
        let identity = Identity::new(user.id, user.display_name(), user.role);

        match &self.issuer {
            CredentialIssuer::Session { sessions } => {
                let session_id = sessions.create(identity);
                Ok(IssuedCredential::Session { session_id })
            }
            CredentialIssuer::Token {
                jwt_service,
                refresh_tokens,
                refresh_token_ttl,
            } => {
                let access_token =
                    jwt_service.generate_access_token(identity.user_id, &identity.username, identity.role)?;

                // Refresh Token 은 사용자당 하나, 로그인마다 덮어씀
                let refresh_token = jwt_service.generate_refresh_token();
                let expires_at = Utc::now()
                    .checked_add_signed(*refresh_token_ttl)
                    .ok_or_else(|| AuthError::Internal("Refresh token expiry out of range".to_string()))?;
                refresh_tokens
                    .upsert(RefreshTokenCreate {
                        user_id: user.id,
                        token_hash: jwt_service.hash_refresh_token(&refresh_token),
                        expires_at,
                    })
                    .await?;

                Ok(IssuedCredential::Token {
                    access_token,
                    refresh_token,
                })
            }
        }
    }

    /// 요청에 실린 인증 수단을 신원으로 변환
    /// Resolve a presented credential into an identity. Errors carry the
    /// specific cause; the gate collapses them to Unauthenticated.
    pub fn resolve(&self, credential: &str) -> Result<Identity, AuthError> {
        match &self.issuer {
            CredentialIssuer::Token { jwt_service, .. } => {
                jwt_service.validate(credential).map_err(AuthError::from)
            }
            CredentialIssuer::Session { sessions } => sessions
                .get(credential)
                .map(|info| info.identity)
                .ok_or(AuthError::SessionNotFound),
        }
    }

    /// Refresh Token 검증 및 새 Access Token 발급
    /// Verify refresh token and issue new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let CredentialIssuer::Token {
            jwt_service,
            refresh_tokens,
            ..
        } = &self.issuer
        else {
            return Err(AuthError::RefreshUnsupported);
        };

        // 1. 해시로 조회
        let token_hash = jwt_service.hash_refresh_token(refresh_token);
        let stored = refresh_tokens
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        // 2. 만료 확인 (만료된 기록은 삭제)
        if stored.is_expired(Utc::now()) {
            refresh_tokens.delete_by_user(stored.user_id).await?;
            tracing::warn!(user_id = stored.user_id, "[Auth] expired refresh token presented");
            return Err(AuthError::Unauthenticated);
        }

        // 3. 사용자 조회
        let user = self
            .users
            .find_by_id(stored.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        // 4. 새 Access Token 발급
        jwt_service.generate_access_token(user.id, user.display_name(), user.role)
    }

    /// 로그아웃
    ///
    /// 세션 모드는 세션을 삭제하고, 토큰 모드는 Refresh Token 만 삭제합니다.
    /// 이미 발급된 Access Token 은 만료 시점까지 유효합니다 (조기 폐기 없음).
    pub async fn logout(&self, identity: &Identity, credential: &str) -> Result<(), AuthError> {
        match &self.issuer {
            CredentialIssuer::Session { sessions } => {
                sessions.remove(credential);
            }
            CredentialIssuer::Token { refresh_tokens, .. } => {
                refresh_tokens.delete_by_user(identity.user_id).await?;
            }
        }

        tracing::info!(user_id = identity.user_id, "[Auth] logout");
        Ok(())
    }

    pub async fn get_user_info(&self, user_id: u64) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated) // 사용자가 없으면 인증 실패
    }

    /// 관리자 계정 생성 (이미 있으면 그대로 둠)
    /// Create the bootstrap admin account if the username is free
    pub async fn ensure_admin(&self, username: &str, password: &str, email: &str) -> Result<User, AuthError> {
        if let Some(existing) = self.users.find_by_username(username).await? {
            return Ok(existing);
        }

        let password_hash = self.hash_password(password.to_string()).await?;
        let user = self
            .users
            .save(NewUser::local(username.to_string(), password_hash, email.to_string()).with_role(Role::Admin))
            .await?;

        tracing::info!(user_id = user.id, "[Auth] bootstrap admin created");
        Ok(user)
    }

    // Argon2 는 CPU 를 많이 쓰므로 blocking 풀에서 실행
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let encoder = self.password_encoder.clone();
        tokio::task::spawn_blocking(move || encoder.encode(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let encoder = self.password_encoder.clone();
        tokio::task::spawn_blocking(move || encoder.matches(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {}", e)))
    }

    async fn burn_password(&self, password: String) -> Result<(), AuthError> {
        let encoder = self.password_encoder.clone();
        tokio::task::spawn_blocking(move || encoder.burn(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {}", e)))
    }
}

fn validate_signup(request: &SignupRequest) -> Result<(), AuthError> {
    // 앞뒤 공백이 있는 아이디는 로그인 아이디와 어긋나므로 거부
    if request.username.trim() != request.username {
        return Err(AuthError::ValidationFailed(
            "Username must not start or end with whitespace".to_string(),
        ));
    }
    let username_len = request.username.chars().count();
    if !USERNAME_LEN.contains(&username_len) {
        return Err(AuthError::ValidationFailed(
            "Username must be between 4 and 20 characters".to_string(),
        ));
    }

    if !PASSWORD_LEN.contains(&request.password.chars().count()) {
        return Err(AuthError::ValidationFailed(
            "Password must be between 8 and 100 characters".to_string(),
        ));
    }

    let email = request.email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !well_formed {
        return Err(AuthError::ValidationFailed("Invalid email address".to_string()));
    }

    Ok(())
}
