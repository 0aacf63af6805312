use serde_json::Value;

/// Provider 별 사용자 정보 추출 규약
/// Fixed extraction contract over a provider's raw attributes.
/// Missing fields come back as `None`; adapters never fail.
pub trait OAuth2UserInfo {
    /// Provider 내부 사용자 ID
    fn provider_id(&self) -> Option<String>;
    fn email(&self) -> Option<String>;
    fn name(&self) -> Option<String>;
}

// 숫자 ID 를 주는 provider 가 있어서 문자열/숫자 모두 허용
fn string_or_number(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Google: 평평한 구조 (`sub`, `email`, `name`)
pub struct GoogleUserInfo {
    attributes: Value,
}

impl GoogleUserInfo {
    pub fn new(attributes: Value) -> Self {
        Self { attributes }
    }
}

impl OAuth2UserInfo for GoogleUserInfo {
    fn provider_id(&self) -> Option<String> {
        string_or_number(self.attributes.get("sub"))
    }

    fn email(&self) -> Option<String> {
        non_empty_str(self.attributes.get("email"))
    }

    fn name(&self) -> Option<String> {
        non_empty_str(self.attributes.get("name"))
    }
}

/// GitHub: 평평한 구조, 숫자 `id`, `name` 이 없으면 `login`
pub struct GithubUserInfo {
    attributes: Value,
}

impl GithubUserInfo {
    pub fn new(attributes: Value) -> Self {
        Self { attributes }
    }
}

impl OAuth2UserInfo for GithubUserInfo {
    fn provider_id(&self) -> Option<String> {
        string_or_number(self.attributes.get("id"))
    }

    fn email(&self) -> Option<String> {
        non_empty_str(self.attributes.get("email"))
    }

    fn name(&self) -> Option<String> {
        non_empty_str(self.attributes.get("name"))
            .or_else(|| non_empty_str(self.attributes.get("login")))
    }
}

/// Kakao: 중첩 구조 (`id`, `kakao_account.email`, `kakao_account.profile.nickname`)
pub struct KakaoUserInfo {
    attributes: Value,
}

impl KakaoUserInfo {
    pub fn new(attributes: Value) -> Self {
        Self { attributes }
    }

    fn account(&self) -> Option<&Value> {
        self.attributes.get("kakao_account").filter(|v| v.is_object())
    }
}

impl OAuth2UserInfo for KakaoUserInfo {
    fn provider_id(&self) -> Option<String> {
        string_or_number(self.attributes.get("id"))
    }

    fn email(&self) -> Option<String> {
        non_empty_str(self.account()?.get("email"))
    }

    fn name(&self) -> Option<String> {
        let profile = self.account()?.get("profile")?;
        non_empty_str(profile.get("nickname"))
    }
}
