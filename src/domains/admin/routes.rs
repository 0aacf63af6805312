// Admin domain routes
use axum::{middleware, routing::get, Router};
use crate::domains::admin::handlers::admin_handler;
use crate::shared::middleware::admin::require_admin;
use crate::shared::services::AppState;

/// Create admin router (ADMIN 권한 필요)
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_handler::admin_page))
        .route_layer(middleware::from_fn(require_admin))
}
