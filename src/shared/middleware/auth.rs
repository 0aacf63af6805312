use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use crate::domains::auth::models::Identity;
use crate::shared::config::CredentialMode;
use crate::shared::errors::AuthError;
use crate::shared::services::AppState;

/// 세션 모드에서 세션 ID 를 싣는 헤더
pub const SESSION_HEADER: &str = "x-session-id";

/// 인증 없이 접근 가능한 경로 (prefix 매칭)
/// Paths the gate lets through without a credential
pub const PUBLIC_PATHS: &[&str] = &["/auth/signup", "/auth/login", "/auth/refresh"];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|prefix| path.starts_with(prefix))
}

/// 요청 헤더에서 인증 수단 추출
///
/// * 토큰 모드: `Authorization: Bearer <token>`
/// * 세션 모드: `X-Session-Id: <id>`
pub fn credential_from_headers(mode: CredentialMode, headers: &HeaderMap) -> Option<&str> {
    let value = match mode {
        CredentialMode::Token => headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?,
        CredentialMode::Session => headers.get(SESSION_HEADER)?.to_str().ok()?,
    };

    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// 게이트를 통과한 요청에 실린 원본 인증 수단 (로그아웃에서 사용)
/// The raw credential the request was admitted with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedCredential(pub String);

/// 인증 게이트 미들웨어
/// 역할: 모든 요청에서 인증 수단을 검증하고 Identity 를 요청에 첨부
///
/// 실패 원인(만료 / 서명 오류 / 없는 세션 등)은 로그로만 남기고
/// 응답은 항상 401 하나로 통일합니다.
pub async fn authenticate(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // nest 된 라우터 안에서도 전체 경로로 판단
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    if is_public_path(&path) {
        return next.run(request).await;
    }

    let auth_service = &app_state.auth_state.auth_service;
    let resolved = match credential_from_headers(auth_service.mode(), request.headers()) {
        Some(credential) => auth_service
            .resolve(credential)
            .map(|identity| (identity, PresentedCredential(credential.to_string()))),
        None => Err(AuthError::Unauthenticated),
    };

    match resolved {
        Ok((identity, credential)) => {
            tracing::debug!(user_id = identity.user_id, %path, "[Auth Gate] identified");
            request.extensions_mut().insert(identity);
            request.extensions_mut().insert(credential);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(%path, cause = %e, "[Auth Gate] rejected request");
            e.public().into_response()
        }
    }
}

/// Identity 를 Axum Extractor로 구현
///
/// 게이트가 첨부한 값을 읽기만 하고 다시 검증하지 않습니다.
///
/// 사용법:
/// ```rust,ignore
/// pub async fn get_me(identity: Identity) -> Result<...> {
///     let user_id = identity.user_id;
///     // ...
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Identity>().cloned().ok_or_else(|| {
            tracing::error!(path = %parts.uri.path(), "[Auth Gate] handler reached without identity");
            AuthError::Unauthenticated
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PresentedCredential
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<PresentedCredential>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}
