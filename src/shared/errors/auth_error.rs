use thiserror::Error;
use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use crate::shared::database::DirectoryError;

/// 인증 관련 에러
/// Authentication-related errors
///
/// Token* / SessionNotFound 는 내부 진단용입니다. 게이트는 이를 로그로 남기고
/// 호출자에게는 Unauthenticated 만 돌려줍니다.
#[derive(Error, Debug)]
pub enum AuthError {
    /// 아이디가 이미 존재함
    #[error("Username already exists")]
    DuplicateUsername,

    /// 이메일이 이미 존재함
    #[error("Email already exists")]
    DuplicateEmail,

    /// 잘못된 아이디 또는 비밀번호 (존재하지 않는 아이디 포함)
    /// Unknown username and wrong password collapse into this one error
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// 입력값 검증 실패
    #[error("{0}")]
    ValidationFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token")]
    TokenMalformed,

    #[error("Token signature invalid")]
    TokenSignatureInvalid,

    #[error("Unsupported token")]
    TokenUnsupported,

    #[error("Session not found")]
    SessionNotFound,

    /// 인증 필요
    #[error("Authentication required")]
    Unauthenticated,

    /// 관리자 권한 필요
    #[error("Admin privileges required")]
    Forbidden,

    /// 지원하지 않는 OAuth Provider
    #[error("Unsupported OAuth provider: {0}")]
    UnsupportedProvider(String),

    /// OAuth state 불일치 / 만료
    #[error("Invalid or expired OAuth state")]
    OAuthStateInvalid,

    /// 사용자가 Provider 동의 화면에서 거부함
    #[error("OAuth authorization denied: {0}")]
    OAuthAuthorizationDenied(String),

    /// Provider 응답에 필수 속성이 없음
    #[error("OAuth provider response is missing {0}")]
    ProviderAttributeMissing(&'static str),

    /// Provider 호출 실패
    #[error("OAuth provider request failed: {0}")]
    ProviderRequestFailed(String),

    /// 세션 모드에서는 refresh 를 지원하지 않음
    #[error("Token refresh is not available for session credentials")]
    RefreshUnsupported,

    /// 비밀번호 해싱 실패
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    PasswordHashingFailed(String),

    /// 데이터베이스(저장소) 에러
    /// Directory error
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 내부 서버 에러
    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateUsername
            | AuthError::DuplicateEmail
            | AuthError::ValidationFailed(_)
            | AuthError::UnsupportedProvider(_)
            | AuthError::OAuthStateInvalid
            | AuthError::RefreshUnsupported => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenMalformed
            | AuthError::TokenSignatureInvalid
            | AuthError::TokenUnsupported
            | AuthError::SessionNotFound
            | AuthError::OAuthAuthorizationDenied(_)
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::ProviderAttributeMissing(_) | AuthError::ProviderRequestFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            AuthError::PasswordHashingFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 외부로 노출할 에러 (자격 증명 검증 실패는 Unauthenticated 로 통일)
    /// Credential-validation causes are collapsed before leaving the core
    pub fn public(self) -> AuthError {
        match self {
            AuthError::TokenExpired
            | AuthError::TokenMalformed
            | AuthError::TokenSignatureInvalid
            | AuthError::TokenUnsupported
            | AuthError::SessionNotFound => AuthError::Unauthenticated,
            other => other,
        }
    }
}

/// AuthError를 HTTP 응답으로 변환
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let err = err.public();
        let status = err.status_code();
        let message = match status {
            // 내부 오류의 상세 내용은 응답에 싣지 않음
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => err.to_string(),
        };

        (status, Json(json!({ "error": message })))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let (status, body): (StatusCode, Json<serde_json::Value>) = self.into();
        (status, body).into_response()
    }
}

impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::UsernameTaken => AuthError::DuplicateUsername,
            DirectoryError::EmailTaken => AuthError::DuplicateEmail,
            DirectoryError::ExternalIdTaken => {
                AuthError::DatabaseError("external account already linked".to_string())
            }
            DirectoryError::Backend(e) => AuthError::DatabaseError(format!("{:#}", e)),
        }
    }
}
