use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;

// 회원가입 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = SignupRequest)]
pub struct SignupRequest {
    /// Username (4-20 chars)
    /// 아이디 (4~20자)
    #[schema(example = "johndoe")]
    pub username: String,

    /// Password (will be hashed, 8-100 chars)
    /// 비밀번호 (해싱됨)
    #[schema(example = "password123")]
    pub password: String,

    /// Email address
    /// 이메일 주소
    #[schema(example = "user@example.com")]
    pub email: String,
}

// 회원가입 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = SignupResponse)]
pub struct SignupResponse {
    /// User information (without password)
    /// 사용자 정보 (비밀번호 제외)
    pub user: UserResponse,

    /// Success message
    /// 성공 메시지
    pub message: String,
}

// 로그인 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginRequest)]
pub struct LoginRequest {
    #[schema(example = "johndoe")]
    pub username: String,

    #[schema(example = "password123")]
    pub password: String,
}

/// 발급된 인증 수단
/// Credential handed to the caller. Exactly one shape per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedCredential {
    /// 세션 모드: X-Session-Id 헤더로 전달
    Session { session_id: String },
    /// 토큰 모드: Authorization: Bearer 로 전달, refresh 로 재발급
    Token { access_token: String, refresh_token: String },
}

impl IssuedCredential {
    /// 리다이렉트 URL 에 붙일 쿼리 파라미터
    /// Query parameters appended to the OAuth2 redirect destination
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        match self {
            IssuedCredential::Session { session_id } => vec![("sessionId", session_id.as_str())],
            IssuedCredential::Token { access_token, refresh_token } => vec![
                ("accessToken", access_token.as_str()),
                ("refreshToken", refresh_token.as_str()),
            ],
        }
    }
}

// 로그인 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = LoginResponse)]
pub struct LoginResponse {
    /// User information (without password)
    /// 사용자 정보 (비밀번호 제외)
    pub user: UserResponse,

    /// JWT Access Token (token mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: Option<String>,

    /// Refresh Token (token mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Session id (session mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Success message
    /// 성공 메시지
    pub message: String,
}

impl LoginResponse {
    pub fn new(user: UserResponse, credential: IssuedCredential) -> Self {
        let mut response = Self {
            user,
            access_token: None,
            refresh_token: None,
            session_id: None,
            message: "Login successful".to_string(),
        };
        match credential {
            IssuedCredential::Session { session_id } => response.session_id = Some(session_id),
            IssuedCredential::Token { access_token, refresh_token } => {
                response.access_token = Some(access_token);
                response.refresh_token = Some(refresh_token);
            }
        }
        response
    }
}

// 토큰 갱신 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = RefreshTokenRequest)]
pub struct RefreshTokenRequest {
    #[schema(example = "abc123def456...")]
    pub refresh_token: String,
}

// 토큰 갱신 응답 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = RefreshTokenResponse)]
pub struct RefreshTokenResponse {
    /// 새 Access Token
    /// New Access Token
    pub access_token: String,

    pub message: String,
}

/// 단순 메시지 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
