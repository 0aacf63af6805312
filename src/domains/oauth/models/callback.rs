use serde::Deserialize;
use utoipa::IntoParams;

/// OAuth2 콜백 쿼리 파라미터
/// Query parameters sent by the provider to the callback route
#[derive(Debug, Deserialize, IntoParams)]
pub struct OAuthCallbackQuery {
    /// Authorization code
    pub code: Option<String>,
    /// 시작 시 발급한 state
    pub state: Option<String>,
    /// 사용자가 동의를 거부하면 provider 가 error 를 보냄
    pub error: Option<String>,
}
