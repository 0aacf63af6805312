use chrono::{DateTime, Utc};

/// Refresh Token 모델 (저장용, 사용자당 1개)
/// Refresh token record; at most one per user, overwritten on every login
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub user_id: u64,
    /// SHA-256 hex of the raw token; the raw value is never stored
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Refresh Token 생성/갱신 요청
/// Refresh token upsert request (when issuing new token)
#[derive(Debug)]
pub struct RefreshTokenCreate {
    pub user_id: u64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
