// Auth handlers module
// 인증 핸들러 모듈

pub mod auth_handler;

pub use auth_handler::*;
