//! # Authentication Configuration Module
//!
//! OpenID Connect 프로바이더 설정과 OAuth 로그인 플로우 설정을 관리하는 모듈입니다.
//!
//! 인증 플로우 컨트롤러는 전역 설정을 직접 조회하지 않습니다. 대신 [`ConfigSource`]
//! 를 통해 읽은 [`ProviderSettings`] 를 생성 시점에 주입받습니다.
//!
//! ## 설정 키
//!
//! | 키 | 환경 변수 | 필수 |
//! |----|-----------|------|
//! | `auth.<id>.key` | `AUTH_<ID>_KEY` | ✅ |
//! | `auth.<id>.secret` | `AUTH_<ID>_SECRET` | ✅ |
//! | `auth.<id>.endpoint.url` | `AUTH_<ID>_ENDPOINT_URL` | ✅ (이슈어 URL) |
//! | `auth.<id>.endpoint.auth_url` | `AUTH_<ID>_ENDPOINT_AUTH_URL` | 선택 (디스커버리 값 덮어쓰기) |
//! | `auth.<id>.endpoint.token_url` | `AUTH_<ID>_ENDPOINT_TOKEN_URL` | 선택 (디스커버리 값 덮어쓰기) |
//! | `server.host` | `SERVER_HOST` | ✅ (콜백 URL 의 호스트) |
//!
//! ## 예시 (.env.dev)
//!
//! ```bash
//! AUTH_PROVIDERS="google"
//! SERVER_HOST="http://localhost:8080"
//! AUTH_GOOGLE_KEY="123456789-abc.apps.googleusercontent.com"
//! AUTH_GOOGLE_SECRET="your-google-client-secret"
//! AUTH_GOOGLE_ENDPOINT_URL="https://accounts.google.com"
//! ```
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{EnvConfigSource, ProviderSettings};
//!
//! let settings = ProviderSettings::load(&EnvConfigSource, "google")?;
//! println!("redirect: {}", settings.redirect_url());
//! ```

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use validator::Validate;

use crate::core::errors::{OpenIdError, OpenIdResult};
use crate::services::auth::callback_url::callback_url;

/// 키 기반 설정 조회 인터페이스
///
/// 설정 로딩 자체는 외부 협력자의 책임이며, 이 크레이트는 문자열 조회만 요구합니다.
pub trait ConfigSource: Send + Sync {
    /// `auth.google.key` 같은 점 표기 키로 값을 조회합니다.
    fn get_string(&self, key: &str) -> Option<String>;
}

/// 환경 변수 기반 설정 소스
///
/// `auth.google.endpoint.auth_url` → `AUTH_GOOGLE_ENDPOINT_AUTH_URL`
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfigSource;

impl EnvConfigSource {
    /// 점 표기 키를 환경 변수 이름으로 변환합니다.
    pub fn env_key(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl ConfigSource for EnvConfigSource {
    fn get_string(&self, key: &str) -> Option<String> {
        env::var(Self::env_key(key)).ok()
    }
}

/// 메모리 기반 설정 소스 (테스트, 임베딩용)
#[derive(Debug, Clone, Default)]
pub struct MapConfigSource {
    values: HashMap<String, String>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigSource for MapConfigSource {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// 설정 소스에서 읽은 프로바이더별 원시 설정
///
/// 디스커버리 전 단계의 값이며, 필수 항목이 비어 있으면 로딩 시점에 실패합니다.
#[derive(Clone, Validate)]
pub struct ProviderSettings {
    #[validate(length(min = 1, message = "프로바이더 ID가 필요합니다"))]
    pub provider_id: String,

    #[validate(length(min = 1, message = "client id (key) 가 필요합니다"))]
    pub client_id: String,

    #[validate(length(min = 1, message = "client secret 이 필요합니다"))]
    pub client_secret: String,

    #[validate(url(message = "이슈어(endpoint.url) 는 유효한 URL 이어야 합니다"))]
    pub issuer_url: String,

    #[validate(length(min = 1, message = "server.host 가 필요합니다"))]
    pub host: String,

    /// 디스커버리 결과 대신 사용할 인증 엔드포인트
    pub auth_url: Option<String>,

    /// 디스커버리 결과 대신 사용할 토큰 엔드포인트
    pub token_url: Option<String>,
}

impl ProviderSettings {
    /// 설정 소스에서 `provider_id` 의 설정을 읽어 검증합니다.
    ///
    /// # Errors
    ///
    /// * `OpenIdError::Discovery` - 필수 키가 없거나 비어 있는 경우
    pub fn load(source: &dyn ConfigSource, provider_id: &str) -> OpenIdResult<Self> {
        let prefix = format!("auth.{}", provider_id);
        let read = |suffix: &str| {
            source
                .get_string(&format!("{}.{}", prefix, suffix))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let optional = |suffix: &str| Some(read(suffix)).filter(|v| !v.is_empty());

        let settings = Self {
            provider_id: provider_id.to_string(),
            client_id: read("key"),
            client_secret: read("secret"),
            issuer_url: read("endpoint.url"),
            host: source
                .get_string("server.host")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            auth_url: optional("endpoint.auth_url"),
            token_url: optional("endpoint.token_url"),
        };

        settings.validate().map_err(|e| {
            OpenIdError::Discovery(format!("{} 프로바이더 설정 오류: {}", provider_id, e))
        })?;

        Ok(settings)
    }

    /// 이 프로바이더의 콜백 URL
    pub fn redirect_url(&self) -> String {
        callback_url(&self.host, &self.provider_id)
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("provider_id", &self.provider_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("issuer_url", &self.issuer_url)
            .field("host", &self.host)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .finish()
    }
}

const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 10;

/// 허용하는 최대 세션 타임아웃 (하루)
pub const MAX_SESSION_TIMEOUT_MINUTES: i64 = 24 * 60;

/// OAuth 로그인 플로우 공통 설정
///
/// 모든 프로바이더에 공통으로 적용되는 state 길이, 세션 타임아웃,
/// 프로바이더 호출 타임아웃을 관리합니다.
pub struct OAuthConfig;

impl OAuthConfig {
    /// 활성화할 프로바이더 ID 목록 (`AUTH_PROVIDERS`, 쉼표 구분)
    ///
    /// # 예제
    ///
    /// ```bash
    /// export AUTH_PROVIDERS="google,gitlab"
    /// ```
    pub fn enabled_providers() -> Vec<String> {
        Self::parse_provider_list(&env::var("AUTH_PROVIDERS").unwrap_or_default())
    }

    pub fn parse_provider_list(raw: &str) -> Vec<String> {
        let mut providers: Vec<String> = Vec::new();
        for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            let id = id.to_lowercase();
            if !providers.contains(&id) {
                providers.push(id);
            }
        }
        providers
    }

    /// OAuth state 값의 난수 바이트 수
    ///
    /// # 기본값
    ///
    /// 32바이트 (256비트). 16 미만의 값은 무시하고 기본값을 사용합니다.
    pub fn state_bytes() -> usize {
        env::var("OAUTH_STATE_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|bytes| *bytes >= 16)
            .unwrap_or(32)
    }

    /// OAuth 세션 타임아웃 (분)
    ///
    /// 로그인 URL 발급 후 콜백까지 허용하는 최대 시간입니다.
    ///
    /// # 기본값
    ///
    /// 10분. 1분 미만이거나 [`MAX_SESSION_TIMEOUT_MINUTES`] 를 넘는 값은 무시합니다.
    pub fn session_timeout_minutes() -> i64 {
        Self::parse_session_timeout(env::var("OAUTH_SESSION_TIMEOUT_MINUTES").ok().as_deref())
    }

    pub fn parse_session_timeout(raw: Option<&str>) -> i64 {
        match raw {
            None => DEFAULT_SESSION_TIMEOUT_MINUTES,
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| (1..=MAX_SESSION_TIMEOUT_MINUTES).contains(minutes))
                .unwrap_or_else(|| {
                    log::error!(
                        "OAUTH_SESSION_TIMEOUT_MINUTES 값이 잘못되었습니다: {}. 기본값 {}분 사용",
                        raw,
                        DEFAULT_SESSION_TIMEOUT_MINUTES
                    );
                    DEFAULT_SESSION_TIMEOUT_MINUTES
                }),
        }
    }

    /// 프로바이더 HTTP 호출 타임아웃
    ///
    /// # 기본값
    ///
    /// 10초
    pub fn http_timeout() -> Duration {
        let secs = env::var("OAUTH_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(10);
        Duration::from_secs(secs)
    }
}
