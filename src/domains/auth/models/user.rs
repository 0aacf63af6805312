use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// 사용자 권한
/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// 인증 제공자
/// Where the account was created (local signup or an OAuth2 provider)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    Local,
    Google,
    Github,
    Kakao,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "LOCAL",
            AuthProvider::Google => "GOOGLE",
            AuthProvider::Github => "GITHUB",
            AuthProvider::Kakao => "KAKAO",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 사용자 모델 (저장소 레코드)
/// User model (directory record)
///
/// LOCAL 계정만 username / password_hash 를 가지고,
/// 외부 계정만 external_id 를 가집니다.
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub email: String,
    pub role: Role,
    pub provider: AuthProvider,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 화면에 표시할 이름 (외부 계정은 username 이 없으므로 email)
    /// Display name: local username, or email for provider-sourced accounts
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }
}

/// 저장 전 사용자 (id / created_at 은 저장소가 부여)
/// User to be saved; the directory assigns id and created_at
#[derive(Debug, Clone)]
pub struct NewUser {
    username: Option<String>,
    password_hash: Option<String>,
    email: String,
    role: Role,
    provider: AuthProvider,
    external_id: Option<String>,
}

impl NewUser {
    /// 로컬 회원가입 사용자
    pub fn local(username: String, password_hash: String, email: String) -> Self {
        Self {
            username: Some(username),
            password_hash: Some(password_hash),
            email,
            role: Role::User,
            provider: AuthProvider::Local,
            external_id: None,
        }
    }

    /// OAuth2 로 프로비저닝되는 사용자
    ///
    /// `provider` must not be `AuthProvider::Local`.
    pub fn external(provider: AuthProvider, external_id: String, email: String) -> Option<Self> {
        if provider == AuthProvider::Local {
            return None;
        }
        Some(Self {
            username: None,
            password_hash: None,
            email,
            role: Role::User,
            provider,
            external_id: Some(external_id),
        })
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn provider(&self) -> AuthProvider {
        self.provider
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn into_user(self, id: u64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            email: self.email,
            role: self.role,
            provider: self.provider,
            external_id: self.external_id,
            created_at,
        }
    }
}

/// 사용자 응답 모델 (비밀번호 제외)
/// User response (password hash never leaves the service)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = UserResponse)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub user_id: u64,

    #[schema(example = "johndoe")]
    pub username: Option<String>,

    #[schema(example = "user@example.com")]
    pub email: String,

    pub role: Role,

    pub provider: AuthProvider,

    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            provider: user.provider,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        user.clone().into()
    }
}
