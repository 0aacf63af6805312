use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use crate::domains::auth::models::Identity;
use crate::shared::errors::AuthError;

/// 관리자 권한 미들웨어 (/admin 라우터 전용)
/// Role gate: runs after the auth gate has attached an Identity
pub async fn require_admin(request: Request, next: Next) -> Response {
    let Some(identity) = request.extensions().get::<Identity>() else {
        // 인증 게이트보다 먼저 실행된 경우 (라우터 구성 오류)
        tracing::error!(path = %request.uri().path(), "[Role Gate] no identity attached");
        return AuthError::Unauthenticated.into_response();
    };

    if !identity.is_admin() {
        tracing::warn!(user_id = identity.user_id, role = %identity.role, "[Role Gate] admin required");
        return AuthError::Forbidden.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use crate::domains::auth::models::Role;

    // 인증 게이트 없이 관리자 게이트만 건 라우터
    fn admin_only_router() -> Router {
        Router::new()
            .route("/admin", get(|| async { "ok" }))
            .route_layer(middleware::from_fn(require_admin))
    }

    async fn call(router: Router) -> (StatusCode, Value) {
        let response = router
            .oneshot(axum::http::Request::builder().uri("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthenticated() {
        let (status, body) = call(admin_only_router()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Authentication required" }));
    }

    #[tokio::test]
    async fn test_identity_role_decides() {
        let user = admin_only_router().layer(Extension(Identity::new(1, "johndoe", Role::User)));
        let (status, body) = call(user).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": "Admin privileges required" }));

        let admin = admin_only_router().layer(Extension(Identity::new(2, "rootadmin", Role::Admin)));
        let (status, _) = call(admin).await;
        assert_eq!(status, StatusCode::OK);
    }
}
