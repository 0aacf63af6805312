// src/domains/auth/services/jwt_service.rs
use crate::shared::errors::AuthError;
use crate::domains::auth::models::identity::Identity;
use crate::domains::auth::models::jwt::Claims;
use crate::domains::auth::models::user::Role;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Sha256, Digest};
use rand::Rng;
use rand::distributions::Alphanumeric;
use thiserror::Error;

/// 토큰 검증 실패 원인 (내부 진단용)
/// Why a token was rejected. Only logged; callers see Unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("bad signature")]
    BadSignature,
    #[error("unsupported token")]
    Unsupported,
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            TokenError::Malformed => AuthError::TokenMalformed,
            TokenError::BadSignature => AuthError::TokenSignatureInvalid,
            TokenError::Unsupported => AuthError::TokenUnsupported,
        }
    }
}

/// JWT 서비스 (HS256)
/// JWT Service for token generation and verification
///
/// 서명 키는 시작 시 한 번만 로드되고 이후 변경되지 않습니다.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_ttl: chrono::Duration,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(secret: &str, access_token_ttl: chrono::Duration) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        let decoding_key = DecodingKey::from_secret(secret.as_ref());

        let mut validation = Validation::new(Algorithm::HS256);
        // 만료는 검증 시점의 현재 시간 기준, 여유 시간 없음
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key,
            decoding_key,
            validation,
            access_token_ttl,
        }
    }

    /// 토큰 발급 (임의의 수명)
    /// Sign a token for the given subject with an explicit lifetime
    pub fn create(
        &self,
        user_id: u64,
        username: &str,
        role: Role,
        ttl: chrono::Duration,
    ) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, username.to_string(), role, ttl)
            .ok_or_else(|| AuthError::Internal("Access token expiry out of range".to_string()))?;

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Access Token 발급 (설정된 짧은 수명)
    /// Generate Access Token (configured short lifetime)
    pub fn generate_access_token(&self, user_id: u64, username: &str, role: Role) -> Result<String, AuthError> {
        self.create(user_id, username, role, self.access_token_ttl)
    }

    /// Access Token 검증
    ///
    /// 서명 검증이 먼저 끝나야 claim 을 읽습니다 (jsonwebtoken::decode 순서).
    pub fn validate(&self, token: &str) -> Result<Identity, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::MissingAlgorithm => TokenError::Unsupported,
                _ => TokenError::Malformed,
            })?;

        let claims = token_data.claims;
        let user_id = claims.sub.parse::<u64>().map_err(|_| TokenError::Malformed)?;
        let role = claims.role.parse::<Role>().map_err(|_| TokenError::Malformed)?;

        Ok(Identity::new(user_id, claims.username, role))
    }

    /// Refresh Token 생성 (랜덤 문자열, 해시만 저장)
    /// Generate Refresh Token (random string; only its hash is stored)
    pub fn generate_refresh_token(&self) -> String {
        // 64자 랜덤 문자열 생성
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    }

    /// Refresh Token 해싱 (저장용)
    /// Hash Refresh Token (for storage)
    pub fn hash_refresh_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret-key-with-at-least-32-bytes!";

    fn service() -> JwtService {
        JwtService::new(SECRET, Duration::hours(1))
    }

    #[test]
    fn test_round_trip_identity() {
        let jwt = service();
        let token = jwt.generate_access_token(7, "admin", Role::Admin).unwrap();

        let identity = jwt.validate(&token).unwrap();
        assert_eq!(identity, Identity::new(7, "admin", Role::Admin));
    }

    /// 테스트: 서명은 유효하지만 만료된 토큰
    #[test]
    fn test_expired_token_rejected() {
        let jwt = service();
        let token = jwt.create(7, "admin", Role::Admin, Duration::seconds(-5)).unwrap();

        assert_eq!(jwt.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_foreign_secret_is_bad_signature() {
        let other = JwtService::new("another-secret-key-with-32-bytes-or-more", Duration::hours(1));
        let token = other.generate_access_token(1, "user", Role::User).unwrap();

        assert_eq!(service().validate(&token), Err(TokenError::BadSignature));
    }

    /// 테스트: 만료 + 잘못된 서명이면 서명 오류가 먼저
    #[test]
    fn test_signature_checked_before_expiry() {
        let other = JwtService::new("another-secret-key-with-32-bytes-or-more", Duration::hours(1));
        let token = other.create(1, "user", Role::User, Duration::seconds(-5)).unwrap();

        assert_eq!(service().validate(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let jwt = service();
        let token = jwt.generate_access_token(1, "user", Role::User).unwrap();
        let forged = jwt.generate_access_token(1, "user", Role::Admin).unwrap();

        // 원래 토큰의 서명에 다른 payload 를 붙임
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(jwt.validate(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let jwt = service();
        assert_eq!(jwt.validate("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(jwt.validate(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_other_algorithm_is_unsupported() {
        let claims = Claims::new(1, "user".to_string(), Role::User, Duration::hours(1)).unwrap();
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        assert_eq!(service().validate(&token), Err(TokenError::Unsupported));
    }

    #[test]
    fn test_unknown_role_is_malformed() {
        let mut claims = Claims::new(1, "user".to_string(), Role::User, Duration::hours(1)).unwrap();
        claims.role = "ROOT".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        assert_eq!(service().validate(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_unrepresentable_expiry_is_internal_error() {
        let jwt = JwtService::new(SECRET, Duration::days(100_000_000));
        let result = jwt.generate_access_token(1, "user", Role::User);
        assert!(matches!(result, Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_refresh_token_shape_and_hash() {
        let jwt = service();
        let first = jwt.generate_refresh_token();
        let second = jwt.generate_refresh_token();

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
        assert_eq!(jwt.hash_refresh_token(&first), jwt.hash_refresh_token(&first));
        assert_eq!(jwt.hash_refresh_token(&first).len(), 64);
    }
}
