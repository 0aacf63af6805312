use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use crate::shared::database::RefreshTokenStore;

/// 만료된 Refresh Token 정리 스케줄러
/// Expired refresh token cleanup scheduler
///
/// 처리 흐름:
/// 1. 시작 시 백그라운드 태스크 실행
/// 2. 주기마다 만료된 기록 삭제
#[derive(Clone)]
pub struct RefreshTokenCleanupScheduler {
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    period: Duration,
}

impl RefreshTokenCleanupScheduler {
    pub fn new(refresh_tokens: Arc<dyn RefreshTokenStore>, period: Duration) -> Self {
        Self { refresh_tokens, period }
    }

    /// 스케줄러 시작
    /// Start scheduler; the returned handle may be aborted on shutdown
    pub fn start(&self) -> JoinHandle<()> {
        let scheduler = self.clone();

        tokio::spawn(async move {
            let mut interval = interval(scheduler.period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                scheduler.run_once().await;
            }
        })
    }

    /// 한 번 정리 실행
    pub async fn run_once(&self) -> u64 {
        match self.refresh_tokens.delete_expired().await {
            Ok(0) => 0,
            Ok(removed) => {
                tracing::info!(removed, "[Refresh Token Cleanup] expired records deleted");
                removed
            }
            Err(e) => {
                tracing::error!(error = %e, "[Refresh Token Cleanup] failed to delete expired records");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::domains::auth::models::RefreshTokenCreate;
    use crate::shared::database::MemoryRefreshTokenStore;

    async fn seeded_store() -> Arc<MemoryRefreshTokenStore> {
        let store = Arc::new(MemoryRefreshTokenStore::new());
        store
            .upsert(RefreshTokenCreate {
                user_id: 1,
                token_hash: "expired".to_string(),
                expires_at: Utc::now() - chrono::Duration::seconds(1),
            })
            .await
            .unwrap();
        store
            .upsert(RefreshTokenCreate {
                user_id: 2,
                token_hash: "live".to_string(),
                expires_at: Utc::now() + chrono::Duration::days(1),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_run_once_deletes_only_expired() {
        let store = seeded_store().await;
        let scheduler = RefreshTokenCleanupScheduler::new(store.clone(), Duration::from_secs(3600));

        assert_eq!(scheduler.run_once().await, 1);
        assert_eq!(store.len(), 1);
        assert!(store.find_by_token_hash("live").await.unwrap().is_some());
    }
}
