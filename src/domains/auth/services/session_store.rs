use std::collections::HashMap;
use parking_lot::RwLock;
use uuid::Uuid;
use crate::domains::auth::models::identity::{Identity, SessionInfo};

/// 세션 저장소 (세션 모드)
/// In-memory session registry
///
/// - 세션 ID 는 UUID v4 (OS CSPRNG), 카운터나 사용자 정보에서 만들지 않음
/// - 내부 RwLock 으로 동기화, 호출자는 잠금 불필요
/// - 만료 없음: 로그아웃으로만 삭제됨
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionInfo>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새로운 세션 생성
    /// Register a session and return its opaque id
    pub fn create(&self, identity: Identity) -> String {
        let info = SessionInfo::new(identity);
        let mut sessions = self.sessions.write();
        loop {
            let session_id = Uuid::new_v4().to_string();
            // 122비트 난수라 충돌은 사실상 없지만 덮어쓰지는 않음
            if !sessions.contains_key(&session_id) {
                sessions.insert(session_id.clone(), info);
                return session_id;
            }
        }
    }

    /// 세션 ID로 세션 정보 조회
    pub fn get(&self, session_id: &str) -> Option<SessionInfo> {
        self.sessions.read().get(session_id).cloned()
    }

    /// 세션 삭제 (로그아웃)
    /// Returns whether a session was removed
    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().remove(session_id).is_some()
    }

    /// 현재 활성 세션 수 조회
    pub fn active_count(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::models::user::Role;
    use std::sync::Arc;

    #[test]
    fn test_create_get_remove() {
        let store = SessionStore::new();
        let id = store.create(Identity::new(1, "johndoe", Role::User));

        let info = store.get(&id).unwrap();
        assert_eq!(info.identity.user_id, 1);
        assert_eq!(info.identity.username, "johndoe");

        assert!(store.remove(&id));
        assert!(store.get(&id).is_none());
        assert!(!store.remove(&id));
    }

    #[test]
    fn test_ids_are_not_derived_from_user() {
        let store = SessionStore::new();
        let a = store.create(Identity::new(1, "same", Role::User));
        let b = store.create(Identity::new(1, "same", Role::User));

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
        assert_eq!(store.active_count(), 2);
    }

    /// 테스트: 여러 스레드에서 동시에 생성
    #[test]
    fn test_concurrent_create_no_collisions() {
        let store = Arc::new(SessionStore::new());
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..250u64)
                        .map(|i| store.create(Identity::new(t * 1000 + i, "u", Role::User)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<String> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 2000);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 2000);
        assert_eq!(store.active_count(), 2000);
    }
}
