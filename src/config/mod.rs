//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리하되,
//! 인증 플로우 컨트롤러에는 조회 결과를 명시적으로 주입합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 서버, 실행 환경 관련 설정
//! - [`auth_config`] - OpenID Connect 프로바이더, OAuth 플로우 관련 설정
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버 설정
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! export SERVER_HOST="https://yourdomain.com"   # 콜백 URL 에 사용되는 공개 호스트
//!
//! # 프로바이더
//! export AUTH_PROVIDERS="google"
//! export AUTH_GOOGLE_KEY="your-client-id"
//! export AUTH_GOOGLE_SECRET="your-client-secret"
//! export AUTH_GOOGLE_ENDPOINT_URL="https://accounts.google.com"
//!
//! # 선택
//! export OAUTH_SESSION_TIMEOUT_MINUTES="10"
//! export OAUTH_HTTP_TIMEOUT_SECS="10"
//! export RATE_LIMIT_PER_SECOND="100"
//! ```

pub mod auth_config;
pub mod data_config;

pub use auth_config::*;
pub use data_config::*;
