// Auth server library
// 인증 서버: 회원가입 / 로그인 / 인증 게이트 / OAuth2 로그인

pub mod domains;
pub mod routes;
pub mod shared;

pub use routes::create_router;
pub use shared::config::{AppConfig, CredentialMode};
pub use shared::services::AppState;
