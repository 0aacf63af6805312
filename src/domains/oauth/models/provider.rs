use std::fmt;
use serde_json::Value;
use crate::domains::auth::models::AuthProvider;
use crate::domains::oauth::models::user_info::{
    GithubUserInfo, GoogleUserInfo, KakaoUserInfo, OAuth2UserInfo,
};
use crate::shared::errors::AuthError;

/// OAuth2 Provider
///
/// 콜백 경로의 마지막 세그먼트(`/login/oauth2/code/{provider}`)로 선택됩니다.
/// Selected by registration id; each variant owns its endpoints and its
/// attribute adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Google,
    Github,
    Kakao,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [OAuthProvider::Google, OAuthProvider::Github, OAuthProvider::Kakao];

    /// registration id ("google" / "github" / "kakao") 로 Provider 선택
    pub fn from_registration_id(registration_id: &str) -> Result<Self, AuthError> {
        Self::ALL
            .into_iter()
            .find(|p| p.registration_id().eq_ignore_ascii_case(registration_id))
            .ok_or_else(|| AuthError::UnsupportedProvider(registration_id.to_string()))
    }

    pub fn registration_id(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
            OAuthProvider::Kakao => "kakao",
        }
    }

    /// 저장소에 기록되는 provider 값
    pub fn auth_provider(&self) -> AuthProvider {
        match self {
            OAuthProvider::Google => AuthProvider::Google,
            OAuthProvider::Github => AuthProvider::Github,
            OAuthProvider::Kakao => AuthProvider::Kakao,
        }
    }

    pub fn authorization_uri(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            OAuthProvider::Github => "https://github.com/login/oauth/authorize",
            OAuthProvider::Kakao => "https://kauth.kakao.com/oauth/authorize",
        }
    }

    pub fn token_uri(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://oauth2.googleapis.com/token",
            OAuthProvider::Github => "https://github.com/login/oauth/access_token",
            OAuthProvider::Kakao => "https://kauth.kakao.com/oauth/token",
        }
    }

    pub fn user_info_uri(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://openidconnect.googleapis.com/v1/userinfo",
            OAuthProvider::Github => "https://api.github.com/user",
            OAuthProvider::Kakao => "https://kapi.kakao.com/v2/user/me",
        }
    }

    pub fn default_scopes(&self) -> &'static [&'static str] {
        match self {
            OAuthProvider::Google => &["openid", "email", "profile"],
            OAuthProvider::Github => &["read:user", "user:email"],
            OAuthProvider::Kakao => &["profile_nickname", "account_email"],
        }
    }

    /// Provider 응답을 정규화하는 어댑터 선택
    /// Pick the attribute adapter for this provider's payload shape
    pub fn user_info(&self, attributes: Value) -> Box<dyn OAuth2UserInfo + Send> {
        match self {
            OAuthProvider::Google => Box::new(GoogleUserInfo::new(attributes)),
            OAuthProvider::Github => Box::new(GithubUserInfo::new(attributes)),
            OAuthProvider::Kakao => Box::new(KakaoUserInfo::new(attributes)),
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.registration_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_id_lookup() {
        assert_eq!(OAuthProvider::from_registration_id("google").unwrap(), OAuthProvider::Google);
        assert_eq!(OAuthProvider::from_registration_id("KAKAO").unwrap(), OAuthProvider::Kakao);
        assert_eq!(OAuthProvider::Github.auth_provider(), AuthProvider::Github);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = OAuthProvider::from_registration_id("local").unwrap_err();
        assert!(matches!(err, AuthError::UnsupportedProvider(name) if name == "local"));
        assert!(OAuthProvider::from_registration_id("naver").is_err());
    }
}
