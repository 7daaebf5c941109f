//! OpenID Connect 인증 서비스 모듈
//!
//! 프로바이더 디스커버리부터 ID 토큰 검증, 프로필 조회까지
//! Authorization Code 플로우를 구성하는 서비스들을 제공합니다.
//!
//! # Modules
//!
//! - [`token_generator`] - state 용 보안 난수 토큰
//! - [`callback_url`] - 프로바이더별 콜백 URL
//! - [`discovery`] - `/.well-known/openid-configuration` 조회
//! - [`jwks`] - 서명 키 집합 조회와 회전
//! - [`verifier`] - ID 토큰 서명/클레임 검증
//! - [`openid_client`] - 프로바이더별 인증 플로우 컨트롤러
//! - [`pending_login`] - 발급된 state 보관소
//! - [`login_service`] - 로그인 시작/완료 조율
//!
//! # Security
//!
//! - state 는 OS CSPRNG 로 생성하고 1회만 소비
//! - ID 토큰은 비대칭 서명 알고리즘만 허용 (`none`, HMAC 거부)
//! - 키 ID 불일치 시 JWKS 를 갱신해 회전된 키로 재검증
//! - userinfo 의 `sub` 를 ID 토큰 subject 와 교차 확인

pub mod callback_url;
pub mod discovery;
pub mod jwks;
pub mod login_service;
pub mod openid_client;
pub mod pending_login;
pub mod request_context;
pub mod token_generator;
pub mod verifier;

pub use callback_url::*;
pub use login_service::*;
pub use openid_client::*;
pub use pending_login::*;
pub use request_context::*;
pub use token_generator::*;
pub use verifier::*;
