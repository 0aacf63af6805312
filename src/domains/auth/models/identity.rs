use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use crate::domains::auth::models::user::Role;

/// 인증된 사용자 정보 (게이트를 통과한 요청에만 존재)
/// Resolved caller identity. This is the only thing downstream handlers
/// learn about the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: u64,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: u64, username: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// 세션 정보 (세션 모드에서 메모리에만 보관)
/// Session record held by the in-memory session store. No expiry.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub identity: Identity,
    pub issued_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            issued_at: Utc::now(),
        }
    }
}
