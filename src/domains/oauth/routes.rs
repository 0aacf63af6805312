// OAuth2 domain routes
// 인증 게이트 밖에 마운트됨
use axum::{routing::get, Router};
use crate::domains::oauth::handlers::oauth_handler;
use crate::shared::services::AppState;

/// Create OAuth2 router
pub fn create_oauth_router() -> Router<AppState> {
    Router::new()
        .route("/oauth2/authorization/:provider", get(oauth_handler::authorize))
        .route("/login/oauth2/code/:provider", get(oauth_handler::callback))
}
