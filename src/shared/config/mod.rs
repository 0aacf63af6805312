// =====================================================
// AppConfig - 서버 설정 (환경 변수)
// =====================================================
// 역할: 환경 변수에서 인증 서버 설정을 읽어서 검증
//
// AUTH_MODE=token (기본값)
//   - Authorization: Bearer <JWT> + Refresh Token
// AUTH_MODE=session
//   - X-Session-Id: <id> (서버 메모리 세션)
// =====================================================

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;
use crate::domains::oauth::models::OAuthProvider;
use crate::shared::errors::ConfigError;

/// HMAC 서명 키 최소 길이 (HS256)
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 토큰 수명 상한 (10년)
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 3600;

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

/// 인증 수단 종류 (배포당 하나)
/// Credential scheme; exactly one per deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMode {
    /// 서명된 JWT + 저장된 Refresh Token
    Token,
    /// 서버 메모리 세션
    Session,
}

impl CredentialMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "token" | "jwt" => Ok(CredentialMode::Token),
            "session" => Ok(CredentialMode::Session),
            _ => Err(ConfigError::InvalidValue {
                key: "AUTH_MODE",
                value: value.to_string(),
                reason: "expected `token` or `session`".to_string(),
            }),
        }
    }
}

/// JWT 설정
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
}

/// Argon2 비용 파라미터
#[derive(Debug, Clone, Copy)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

/// Provider 별 OAuth2 클라이언트 등록 정보
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// OAuth2 설정
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// 로그인 성공 후 프론트엔드로 보낼 주소
    pub redirect_url: Url,
    pub clients: HashMap<OAuthProvider, OAuthClientConfig>,
    pub request_timeout: Duration,
}

impl OAuthConfig {
    pub fn client(&self, provider: OAuthProvider) -> Option<&OAuthClientConfig> {
        self.clients.get(&provider)
    }
}

/// 시작 시 생성할 관리자 계정 (ADMIN_USERNAME 이 있을 때만)
#[derive(Debug, Clone)]
pub struct AdminBootstrapConfig {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// 전체 서버 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: SocketAddr,
    pub cors_allowed_origin: String,
    pub credential_mode: CredentialMode,
    pub jwt: JwtConfig,
    pub password_hash: PasswordHashConfig,
    pub oauth: OAuthConfig,
    pub admin: Option<AdminBootstrapConfig>,
}

impl AppConfig {
    /// 환경 변수에서 설정 읽기
    ///
    /// # 환경 변수
    /// * `AUTH_MODE` - "token" 또는 "session" (기본값: "token")
    /// * `JWT_SECRET` - 32바이트 이상
    /// * `JWT_ACCESS_TOKEN_TTL_SECS` (기본값: 3600)
    /// * `JWT_REFRESH_TOKEN_TTL_SECS` (기본값: 604800)
    /// * `OAUTH2_REDIRECT_URL` (기본값: "http://localhost:3000/oauth2/redirect")
    /// * `OAUTH2_{GOOGLE,GITHUB,KAKAO}_CLIENT_ID` / `_CLIENT_SECRET` / `_REDIRECT_URI`
    /// * `ADMIN_USERNAME` / `ADMIN_PASSWORD` / `ADMIN_EMAIL` (선택)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 key 조회 함수로 설정 읽기 (테스트에서 사용)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr = parse_or(&lookup, "SERVER_ADDR", SocketAddr::from(([0, 0, 0, 0], 3002)))?;
        let cors_allowed_origin = lookup("CORS_ALLOWED_ORIGIN")
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        let credential_mode = match lookup("AUTH_MODE") {
            Some(value) => CredentialMode::parse(&value)?,
            None => CredentialMode::Token,
        };

        let secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET is not set, using the development default");
                DEFAULT_JWT_SECRET.to_string()
            }
        };
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::WeakJwtSecret {
                min: MIN_JWT_SECRET_LEN,
                actual: secret.len(),
            });
        }

        let access_ttl: i64 = parse_or(&lookup, "JWT_ACCESS_TOKEN_TTL_SECS", 3600)?;
        let refresh_ttl: i64 = parse_or(&lookup, "JWT_REFRESH_TOKEN_TTL_SECS", 7 * 24 * 3600)?;
        for (key, value) in [
            ("JWT_ACCESS_TOKEN_TTL_SECS", access_ttl),
            ("JWT_REFRESH_TOKEN_TTL_SECS", refresh_ttl),
        ] {
            if value <= 0 || value > MAX_TOKEN_TTL_SECS {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: value.to_string(),
                    reason: format!("must be between 1 and {} seconds", MAX_TOKEN_TTL_SECS),
                });
            }
        }
        let access_token_ttl = ttl_duration("JWT_ACCESS_TOKEN_TTL_SECS", access_ttl)?;
        let refresh_token_ttl = ttl_duration("JWT_REFRESH_TOKEN_TTL_SECS", refresh_ttl)?;

        let defaults = PasswordHashConfig::default();
        let password_hash = PasswordHashConfig {
            memory_kib: parse_or(&lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        };

        let redirect_raw = lookup("OAUTH2_REDIRECT_URL")
            .unwrap_or_else(|| "http://localhost:3000/oauth2/redirect".to_string());
        let redirect_url = Url::parse(&redirect_raw).map_err(|e| ConfigError::InvalidValue {
            key: "OAUTH2_REDIRECT_URL",
            value: redirect_raw.clone(),
            reason: e.to_string(),
        })?;

        let mut clients = HashMap::new();
        for provider in OAuthProvider::ALL {
            if let Some(client) = oauth_client(&lookup, provider)? {
                clients.insert(provider, client);
            }
        }

        let timeout_secs: u64 = parse_or(&lookup, "OAUTH2_REQUEST_TIMEOUT_SECS", 10)?;

        let admin = match lookup("ADMIN_USERNAME") {
            Some(username) => Some(AdminBootstrapConfig {
                password: lookup("ADMIN_PASSWORD").ok_or_else(|| {
                    ConfigError::MissingValue("ADMIN_PASSWORD".to_string(), "ADMIN_USERNAME".to_string())
                })?,
                email: lookup("ADMIN_EMAIL").unwrap_or_else(|| format!("{}@localhost.local", username)),
                username,
            }),
            None => None,
        };

        Ok(Self {
            server_addr,
            cors_allowed_origin,
            credential_mode,
            jwt: JwtConfig {
                secret,
                access_token_ttl,
                refresh_token_ttl,
            },
            password_hash,
            oauth: OAuthConfig {
                redirect_url,
                clients,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            admin,
        })
    }
}

fn ttl_duration(key: &'static str, secs: i64) -> Result<chrono::Duration, ConfigError> {
    chrono::Duration::try_seconds(secs).ok_or_else(|| ConfigError::InvalidValue {
        key,
        value: secs.to_string(),
        reason: "out of range".to_string(),
    })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

// client id 가 있으면 secret 과 redirect uri 도 있어야 함
fn oauth_client<F>(lookup: &F, provider: OAuthProvider) -> Result<Option<OAuthClientConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = format!("OAUTH2_{}", provider.registration_id().to_ascii_uppercase());
    let id_key = format!("{}_CLIENT_ID", prefix);
    let Some(client_id) = lookup(&id_key) else {
        return Ok(None);
    };

    let secret_key = format!("{}_CLIENT_SECRET", prefix);
    let client_secret = lookup(&secret_key)
        .ok_or_else(|| ConfigError::MissingValue(secret_key.clone(), id_key.clone()))?;

    let redirect_key = format!("{}_REDIRECT_URI", prefix);
    let redirect_uri = lookup(&redirect_key).unwrap_or_else(|| {
        format!("http://localhost:3002/login/oauth2/code/{}", provider.registration_id())
    });

    Ok(Some(OAuthClientConfig {
        client_id,
        client_secret,
        redirect_uri,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.credential_mode, CredentialMode::Token);
        assert_eq!(config.jwt.access_token_ttl, chrono::Duration::hours(1));
        assert_eq!(config.jwt.refresh_token_ttl, chrono::Duration::days(7));
        assert!(config.oauth.clients.is_empty());
        assert_eq!(config.server_addr.port(), 3002);
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        for value in ["9223372036854775807", "9000000000000000", "315360001"] {
            let result = AppConfig::from_lookup(lookup_from(&[("JWT_REFRESH_TOKEN_TTL_SECS", value)]));
            assert!(matches!(
                result,
                Err(ConfigError::InvalidValue { key: "JWT_REFRESH_TOKEN_TTL_SECS", .. })
            ));
        }

        let result = AppConfig::from_lookup(lookup_from(&[("JWT_ACCESS_TOKEN_TTL_SECS", "9000000000000000")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "JWT_ACCESS_TOKEN_TTL_SECS", .. })
        ));

        // 상한값 자체는 허용
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_REFRESH_TOKEN_TTL_SECS", "315360000")])).unwrap();
        assert_eq!(config.jwt.refresh_token_ttl, chrono::Duration::days(3650));
    }

    #[test]
    fn test_admin_bootstrap_requires_password() {
        assert!(AppConfig::from_lookup(lookup_from(&[("ADMIN_USERNAME", "admin")])).is_err());

        let config = AppConfig::from_lookup(lookup_from(&[
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "adminpass123"),
        ]))
        .unwrap();
        let admin = config.admin.unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.email, "admin@localhost.local");
    }

    #[test]
    fn test_session_mode_and_kakao_client() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("AUTH_MODE", "session"),
            ("OAUTH2_KAKAO_CLIENT_ID", "kakao-id"),
            ("OAUTH2_KAKAO_CLIENT_SECRET", "kakao-secret"),
        ]))
        .unwrap();
        assert_eq!(config.credential_mode, CredentialMode::Session);
        let kakao = config.oauth.client(OAuthProvider::Kakao).unwrap();
        assert_eq!(kakao.client_id, "kakao-id");
        assert!(kakao.redirect_uri.ends_with("/login/oauth2/code/kakao"));
        assert!(config.oauth.client(OAuthProvider::Google).is_none());
    }

    #[test]
    fn test_rejects_short_secret() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "short")])).unwrap_err();
        assert!(matches!(err, ConfigError::WeakJwtSecret { actual: 5, .. }));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup_from(&[("AUTH_MODE", "cookie")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("JWT_ACCESS_TOKEN_TTL_SECS", "-1")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("OAUTH2_GOOGLE_CLIENT_ID", "id")])).is_err());
    }
}
