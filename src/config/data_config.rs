//! 서버 및 실행 환경 설정 관리 모듈
//!
//! 서버 바인딩 주소, 실행 환경(개발/테스트/스테이징/프로덕션), 요청 속도 제한 설정을 관리합니다.

use std::env;

/// 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// `ENVIRONMENT` 환경 변수로 현재 실행 환경을 판별합니다. (기본값: Production)
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 프로덕션에서는 HTTP 콜백 호스트를 허용하지 않습니다.
    pub fn requires_https(&self) -> bool {
        matches!(self, Environment::Staging | Environment::Production)
    }
}

/// `PROFILE` 별 환경 파일
///
/// * `prod` - `.env.prod`
/// * `dev` - `.env.dev`
/// * 기타 - `.env`
pub struct EnvFile;

impl EnvFile {
    pub fn for_profile(profile: &str) -> &'static str {
        match profile {
            "prod" => ".env.prod",
            "dev" => ".env.dev",
            _ => ".env",
        }
    }
}

/// HTTP 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// 요청 속도 제한 설정
///
/// ```bash
/// RATE_LIMIT_PER_SECOND=20   # 기본값 100
/// RATE_LIMIT_BURST_SIZE=40   # 기본값 200
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitConfig {
    pub fn load() -> Self {
        Self::parse(
            env::var("RATE_LIMIT_PER_SECOND").ok().as_deref(),
            env::var("RATE_LIMIT_BURST_SIZE").ok().as_deref(),
        )
    }

    pub fn parse(per_second: Option<&str>, burst_size: Option<&str>) -> Self {
        let per_second = per_second
            .unwrap_or("100")
            .parse::<u64>()
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or_else(|| {
                log::error!("RATE_LIMIT_PER_SECOND 파싱 실패. 기본값 100 사용");
                100
            });

        let burst_size = burst_size
            .unwrap_or("200")
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or_else(|| {
                log::error!("RATE_LIMIT_BURST_SIZE 파싱 실패. 기본값 200 사용");
                200
            });

        Self {
            per_second,
            burst_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(
            Environment::from_str("development"),
            Environment::Development
        );
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("Stage"), Environment::Staging);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_https_requirement() {
        assert!(!Environment::Development.requires_https());
        assert!(!Environment::Test.requires_https());
        assert!(Environment::Staging.requires_https());
        assert!(Environment::Production.requires_https());
    }

    #[test]
    fn test_env_file_for_profile() {
        assert_eq!(EnvFile::for_profile("prod"), ".env.prod");
        assert_eq!(EnvFile::for_profile("dev"), ".env.dev");
        assert_eq!(EnvFile::for_profile("staging"), ".env");
    }

    #[test]
    fn test_rate_limit_parse() {
        assert_eq!(
            RateLimitConfig::parse(None, None),
            RateLimitConfig {
                per_second: 100,
                burst_size: 200
            }
        );
        assert_eq!(RateLimitConfig::parse(Some("20"), Some("40")).burst_size, 40);
        assert_eq!(RateLimitConfig::parse(Some("abc"), Some("0")).per_second, 100);
        assert_eq!(RateLimitConfig::parse(Some("abc"), Some("0")).burst_size, 200);
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }

        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "0.0.0.0");
        }
    }
}
