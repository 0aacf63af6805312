use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use crate::shared::config::PasswordHashConfig;
use crate::shared::errors::AuthError;

/// 비밀번호 인코더 (Argon2id)
/// Password encoder
///
/// - 단방향 해시 (복호화 불가)
/// - 호출마다 새 Salt (같은 비밀번호도 매번 다른 해시)
/// - 검증은 argon2 verifier 의 상수 시간 비교 사용
#[derive(Clone)]
pub struct PasswordEncoder {
    argon2: Argon2<'static>,
    // 존재하지 않는 사용자 로그인 시 같은 비용을 쓰기 위한 더미 해시
    dummy_hash: String,
}

impl PasswordEncoder {
    pub fn new(config: PasswordHashConfig) -> Result<Self, AuthError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Invalid argon2 params: {}", e)))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(b"dummy-password-for-timing", &salt)
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
            .to_string();

        Ok(Self { argon2, dummy_hash })
    }

    /// 평문 비밀번호를 해싱 (PHC 문자열)
    /// Hash a raw password into a PHC string
    pub fn encode(&self, raw_password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    /// 평문 비밀번호와 저장된 해시가 일치하는지 검증
    ///
    /// 저장된 해시를 파싱할 수 없으면 false (로그만 남김)
    pub fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        let parsed_hash = match PasswordHash::new(encoded_password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("Stored password hash is not a valid PHC string: {}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// 더미 해시로 검증만 수행 (결과는 항상 버림)
    /// Spend one verification's worth of work; used when the account does not exist
    pub fn burn(&self, raw_password: &str) {
        let _ = self.matches(raw_password, &self.dummy_hash);
    }
}
