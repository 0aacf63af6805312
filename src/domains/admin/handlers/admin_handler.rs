use crate::domains::auth::models::{Identity, MessageResponse};
use axum::Json;

/// 관리자 페이지
///
/// 인증 게이트와 관리자 권한 미들웨어를 통과한 요청만 도달합니다.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Admin greeting", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin privileges required")
    ),
    security(
        ("BearerAuth" = []),
        ("SessionAuth" = [])
    ),
    tag = "Admin"
)]
pub async fn admin_page(identity: Identity) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!("Hello World, {} (admin)", identity.username)))
}
