/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - 비밀번호 해싱 (Argon2)
pub mod password_encoder;

pub use password_encoder::*;
