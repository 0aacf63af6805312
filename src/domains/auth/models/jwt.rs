use serde::{Deserialize, Serialize};
use crate::domains::auth::models::user::Role;

/// JWT Claims (토큰에 포함될 데이터)
/// JWT Claims (data to be included in token)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 토큰 주체 (사용자 ID, 문자열)
    /// Subject (user id as a string)
    pub sub: String,

    /// 사용자 이름 (외부 계정은 이메일)
    /// Username (email for provider-sourced accounts)
    pub username: String,

    /// 권한 ("ADMIN" / "USER")
    pub role: String,

    /// 발급 시간 (Unix timestamp)
    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// 만료 시간 (Unix timestamp)
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새 Claims 생성 (만료 시간 자동 계산)
    /// Create new Claims; `ttl` may be negative (already expired).
    /// Returns None when the expiry falls outside the representable range.
    pub fn new(user_id: u64, username: String, role: Role, ttl: chrono::Duration) -> Option<Self> {
        let now = chrono::Utc::now();
        let exp = now.checked_add_signed(ttl)?;

        Some(Self {
            sub: user_id.to_string(),
            username,
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }
}
