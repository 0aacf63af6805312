use std::collections::HashMap;
use std::time::{Duration, Instant};
use parking_lot::Mutex;
use rand::Rng;
use rand::distributions::Alphanumeric;
use crate::domains::oauth::models::OAuthProvider;

/// state 값 유효 시간
pub const OAUTH_STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// OAuth2 state 저장소 (CSRF 방지)
/// Pending authorization requests, keyed by the random `state` parameter
///
/// - state 는 한 번만 사용 가능 (consume 시 삭제)
/// - 발급한 Provider 의 콜백에서만 유효
pub struct OAuthStateStore {
    pending: Mutex<HashMap<String, (OAuthProvider, Instant)>>,
    ttl: Duration,
}

impl Default for OAuthStateStore {
    fn default() -> Self {
        Self::new(OAUTH_STATE_TTL)
    }
}

impl OAuthStateStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// 새 state 발급
    pub fn issue(&self, provider: OAuthProvider) -> String {
        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let now = Instant::now();
        let mut pending = self.pending.lock();
        // 만료된 항목은 발급 시점에 정리
        pending.retain(|_, (_, issued_at)| now.duration_since(*issued_at) < self.ttl);
        pending.insert(state.clone(), (provider, now));
        state
    }

    /// state 사용 (일치 + 미만료일 때만 true, 결과와 무관하게 삭제)
    pub fn consume(&self, state: &str, provider: OAuthProvider) -> bool {
        match self.pending.lock().remove(state) {
            Some((issued_for, issued_at)) => issued_for == provider && issued_at.elapsed() < self.ttl,
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_single_use() {
        let store = OAuthStateStore::default();
        let state = store.issue(OAuthProvider::Google);

        assert!(store.consume(&state, OAuthProvider::Google));
        assert!(!store.consume(&state, OAuthProvider::Google));
    }

    #[test]
    fn test_state_bound_to_provider() {
        let store = OAuthStateStore::default();
        let state = store.issue(OAuthProvider::Google);

        assert!(!store.consume(&state, OAuthProvider::Kakao));
        // 잘못된 Provider 로 한 번 쓰면 폐기됨
        assert!(!store.consume(&state, OAuthProvider::Google));
    }

    #[test]
    fn test_expired_state_rejected() {
        let store = OAuthStateStore::new(Duration::ZERO);
        let state = store.issue(OAuthProvider::Github);

        assert!(!store.consume(&state, OAuthProvider::Github));
        assert_eq!(store.pending_count(), 0);
    }
}
