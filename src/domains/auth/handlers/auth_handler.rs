use crate::domains::auth::models::{
    Identity, LoginRequest, LoginResponse, MessageResponse, RefreshTokenRequest,
    RefreshTokenResponse, SignupRequest, SignupResponse, UserResponse,
};
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;
use crate::shared::middleware::auth::PresentedCredential;
use axum::{extract::State, http::StatusCode, Json};

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = SignupResponse),
        (status = 400, description = "Bad request (validation failed, username or email already exists)"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(app_state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), (StatusCode, Json<serde_json::Value>)> {
    // Service 호출 (비즈니스 로직)
    let user = app_state
        .auth_state
        .auth_service
        .signup(request)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: user.into(),
            message: "User created successfully".to_string(),
        }),
    ))
}

// 로그인 핸들러
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful (tokens or session id depending on AUTH_MODE)", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<serde_json::Value>)> {
    // Service 호출 (비즈니스 로직 + 인증 수단 발급)
    let (user, credential) = app_state
        .auth_state
        .auth_service
        .login(request)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(LoginResponse::new(user.into(), credential)))
}

/// 토큰 갱신 핸들러
/// Refresh token handler
#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed successfully", body = RefreshTokenResponse),
        (status = 400, description = "Refresh is not available in session mode"),
        (status = 401, description = "Invalid or expired refresh token"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, (StatusCode, Json<serde_json::Value>)> {
    let access_token = app_state
        .auth_state
        .auth_service
        .refresh(&request.refresh_token)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(RefreshTokenResponse {
        access_token,
        message: "Token refreshed successfully".to_string(),
    }))
}

/// 로그아웃 핸들러
/// Logout handler
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = []),
        ("SessionAuth" = [])
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(app_state): State<AppState>,
    identity: Identity,
    PresentedCredential(credential): PresentedCredential,
) -> Result<Json<MessageResponse>, (StatusCode, Json<serde_json::Value>)> {
    app_state
        .auth_state
        .auth_service
        .logout(&identity, &credential)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(MessageResponse::new("Logout successful")))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "User info retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = []),
        ("SessionAuth" = [])
    ),
    tag = "Auth"
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    identity: Identity,
) -> Result<Json<UserResponse>, (StatusCode, Json<serde_json::Value>)> {
    // Service 호출 (비즈니스 로직)
    let user = app_state
        .auth_state
        .auth_service
        .get_user_info(identity.user_id)
        .await
        .map_err(|e: AuthError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(user.into()))
}
