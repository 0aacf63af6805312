use crate::domains::oauth::models::OAuthCallbackQuery;
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};

/// OAuth2 로그인 시작 (Provider 인가 페이지로 리다이렉트)
#[utoipa::path(
    get,
    path = "/oauth2/authorization/{provider}",
    params(
        ("provider" = String, Path, description = "google / github / kakao")
    ),
    responses(
        (status = 303, description = "Redirect to the provider's authorization page"),
        (status = 400, description = "Unsupported or unconfigured provider")
    ),
    tag = "OAuth2"
)]
pub async fn authorize(
    State(app_state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Redirect, (StatusCode, Json<serde_json::Value>)> {
    let url = app_state
        .oauth_state
        .oauth_service
        .authorization_url(&provider)
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Redirect::to(url.as_str()))
}

/// OAuth2 콜백
/// 역할: code 교환 → 사용자 조회/생성 → 인증 수단을 붙여 프론트엔드로 리다이렉트
#[utoipa::path(
    get,
    path = "/login/oauth2/code/{provider}",
    params(
        ("provider" = String, Path, description = "google / github / kakao"),
        OAuthCallbackQuery
    ),
    responses(
        (status = 303, description = "Redirect to the frontend with accessToken/refreshToken or sessionId"),
        (status = 400, description = "Invalid state or unsupported provider"),
        (status = 502, description = "Provider request failed or response missing required attributes")
    ),
    tag = "OAuth2"
)]
pub async fn callback(
    State(app_state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Redirect, (StatusCode, Json<serde_json::Value>)> {
    let url = app_state
        .oauth_state
        .oauth_service
        .handle_callback(&provider, query)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Redirect::to(url.as_str()))
}
