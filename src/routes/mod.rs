// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::{middleware, Router};
use crate::shared::middleware::auth::authenticate;
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::admin::routes::create_admin_router;
use crate::domains::auth::routes::create_auth_router;
use crate::domains::oauth::routes::create_oauth_router;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
///
/// * `/auth`, `/admin` 은 인증 게이트 안쪽 (signup / login / refresh 제외)
/// * `/admin` 은 추가로 ADMIN 권한 필요
/// * OAuth2 시작 / 콜백은 게이트 밖
pub fn create_router(app_state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .nest("/auth", create_auth_router())
        .nest("/admin", create_admin_router())
        .route_layer(middleware::from_fn_with_state(app_state, authenticate));

    Router::new()
        .merge(gated)
        .merge(create_oauth_router())
}
