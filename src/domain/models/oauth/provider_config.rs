//! 프로바이더별 OAuth 2.0 클라이언트 설정

/// 요청하는 고정 스코프 집합
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "email", "profile"];

/// 디스커버리가 끝난 뒤 완성되는 불변 클라이언트 설정
///
/// 프로바이더당 하나씩 시작 시점에 만들어지며 프로세스 종료까지 변경되지 않습니다.
/// `client_secret` 은 `Debug` 출력에 포함되지 않습니다.
#[derive(Clone)]
pub struct ProviderConfig {
    pub provider_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub issuer_url: String,
    pub scopes: Vec<String>,
}

impl ProviderConfig {
    /// 스코프를 공백으로 연결한 `scope` 파라미터 값
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider_id", &self.provider_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_url", &self.redirect_url)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("issuer_url", &self.issuer_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let config = ProviderConfig {
            provider_id: "google".to_string(),
            client_id: "client".to_string(),
            client_secret: "s3cr3t".to_string(),
            redirect_url: "https://example.com/api/v1/login/google/callback".to_string(),
            auth_url: "https://accounts.example.com/auth".to_string(),
            token_url: "https://accounts.example.com/token".to_string(),
            issuer_url: "https://accounts.example.com".to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        let printed = format!("{:?}", config);
        assert!(!printed.contains("s3cr3t"));
        assert_eq!(config.scope_param(), "openid email profile");
    }
}
