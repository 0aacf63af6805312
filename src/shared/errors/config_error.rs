use thiserror::Error;

/// 설정 로딩 에러
/// Configuration errors (fail fast at startup)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("JWT_SECRET must be at least {min} bytes, got {actual}")]
    WeakJwtSecret { min: usize, actual: usize },

    #[error("{0} is required when {1} is set")]
    MissingValue(String, String),
}
