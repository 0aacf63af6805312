use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use crate::domains::auth::models::refresh_token::{RefreshToken, RefreshTokenCreate};
use crate::shared::database::repositories::auth::user_repository::DirectoryError;

/// Refresh Token 저장소 규약
/// Refresh token store: one active record per user
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Refresh Token 저장 (사용자당 1개, 기존 값은 덮어씀)
    /// Insert or overwrite the user's refresh record
    async fn upsert(&self, data: RefreshTokenCreate) -> Result<RefreshToken, DirectoryError>;

    /// Refresh Token 조회 (token_hash로)
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DirectoryError>;

    /// 사용자의 Refresh Token 삭제 (로그아웃 시)
    async fn delete_by_user(&self, user_id: u64) -> Result<(), DirectoryError>;

    /// 만료된 토큰 삭제 (정리 작업)
    /// Delete expired tokens, returning how many were removed
    async fn delete_expired(&self) -> Result<u64, DirectoryError>;
}

#[derive(Default)]
struct Records {
    by_user: HashMap<u64, RefreshToken>,
    by_hash: HashMap<String, u64>,
}

impl Records {
    fn remove_user(&mut self, user_id: u64) -> Option<RefreshToken> {
        let removed = self.by_user.remove(&user_id)?;
        self.by_hash.remove(&removed.token_hash);
        Some(removed)
    }
}

/// 메모리 Refresh Token 저장소
#[derive(Default)]
pub struct MemoryRefreshTokenStore {
    records: Mutex<Records>,
}

impl MemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn upsert(&self, data: RefreshTokenCreate) -> Result<RefreshToken, DirectoryError> {
        let mut records = self.records.lock();
        let now = Utc::now();

        let created_at = records
            .remove_user(data.user_id)
            .map(|previous| previous.created_at)
            .unwrap_or(now);

        let record = RefreshToken {
            user_id: data.user_id,
            token_hash: data.token_hash,
            expires_at: data.expires_at,
            created_at,
            updated_at: now,
        };
        records.by_hash.insert(record.token_hash.clone(), record.user_id);
        records.by_user.insert(record.user_id, record.clone());

        Ok(record)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DirectoryError> {
        let records = self.records.lock();
        Ok(records
            .by_hash
            .get(token_hash)
            .and_then(|user_id| records.by_user.get(user_id))
            .cloned())
    }

    async fn delete_by_user(&self, user_id: u64) -> Result<(), DirectoryError> {
        self.records.lock().remove_user(user_id);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, DirectoryError> {
        let mut records = self.records.lock();
        let now = Utc::now();

        let expired: Vec<u64> = records
            .by_user
            .values()
            .filter(|record| record.is_expired(now))
            .map(|record| record.user_id)
            .collect();
        for user_id in &expired {
            records.remove_user(*user_id);
        }

        Ok(expired.len() as u64)
    }
}
