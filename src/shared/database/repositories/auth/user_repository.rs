use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;
use crate::domains::auth::models::user::{AuthProvider, NewUser, User};

/// 저장소 에러
/// Directory errors. Uniqueness violations are reported distinctly so the
/// service can map a lost signup race to the same client error as the
/// up-front check.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("email already exists")]
    EmailTaken,

    #[error("external account already linked")]
    ExternalIdTaken,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// 사용자 저장소 규약
/// User directory contract. Persistence mechanics live behind this trait;
/// the auth core only consumes these operations.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: u64) -> Result<Option<User>, DirectoryError>;

    // 아이디로 사용자 조회 (로그인용)
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError>;

    // OAuth2 사용자 조회
    async fn find_by_provider_and_external_id(
        &self,
        provider: AuthProvider,
        external_id: &str,
    ) -> Result<Option<User>, DirectoryError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, DirectoryError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, DirectoryError>;

    /// 새 사용자 저장 (id, created_at 부여)
    /// Persist a new user; must enforce username / email / external id uniqueness
    async fn save(&self, user: NewUser) -> Result<User, DirectoryError>;
}

#[derive(Default)]
struct Users {
    next_id: u64,
    by_id: HashMap<u64, User>,
    by_username: HashMap<String, u64>,
    by_email: HashMap<String, u64>,
    by_external_id: HashMap<(AuthProvider, String), u64>,
}

/// 메모리 사용자 저장소
/// In-process directory; uniqueness checks and insert happen under one write lock
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: RwLock<Users>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, index: impl FnOnce(&Users) -> Option<u64>) -> Option<User> {
        let users = self.users.read();
        index(&users).and_then(|id| users.by_id.get(&id).cloned())
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: u64) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.read().by_id.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self.lookup(|u| u.by_username.get(username).copied()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self.lookup(|u| u.by_email.get(email).copied()))
    }

    async fn find_by_provider_and_external_id(
        &self,
        provider: AuthProvider,
        external_id: &str,
    ) -> Result<Option<User>, DirectoryError> {
        let key = (provider, external_id.to_string());
        Ok(self.lookup(|u| u.by_external_id.get(&key).copied()))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DirectoryError> {
        Ok(self.users.read().by_username.contains_key(username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DirectoryError> {
        Ok(self.users.read().by_email.contains_key(email))
    }

    async fn save(&self, user: NewUser) -> Result<User, DirectoryError> {
        let mut users = self.users.write();

        // 같은 외부 계정의 동시 저장은 ExternalIdTaken 으로 판정 (이메일보다 먼저)
        let external_key = user
            .external_id()
            .map(|external_id| (user.provider(), external_id.to_string()));
        if let Some(key) = &external_key {
            if users.by_external_id.contains_key(key) {
                return Err(DirectoryError::ExternalIdTaken);
            }
        }
        if let Some(username) = user.username() {
            if users.by_username.contains_key(username) {
                return Err(DirectoryError::UsernameTaken);
            }
        }
        if users.by_email.contains_key(user.email()) {
            return Err(DirectoryError::EmailTaken);
        }

        users.next_id += 1;
        let id = users.next_id;
        let user = user.into_user(id, Utc::now());

        if let Some(username) = &user.username {
            users.by_username.insert(username.clone(), id);
        }
        users.by_email.insert(user.email.clone(), id);
        if let Some(key) = external_key {
            users.by_external_id.insert(key, id);
        }
        users.by_id.insert(id, user.clone());

        Ok(user)
    }
}
