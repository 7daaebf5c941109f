//! OpenID Connect 로그인 백엔드
//!
//! OpenID Connect 프로바이더(Google 등)를 통한 Authorization Code 로그인을
//! 처리하는 relying party 서비스입니다.
//!
//! # Features
//!
//! - **디스커버리**: `/.well-known/openid-configuration` 과 JWKS 로 프로바이더 구성
//! - **ID 토큰 검증**: 서명, issuer, audience, 만료 검증과 키 회전 대응
//! - **state 관리**: OS 난수 기반 1회용 state
//! - **프로필 조회**: userinfo 조회와 subject 교차 확인
//! - **계정 등록**: subject 기준 계정 생성/갱신, 가입 완료 판정
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /api/v1/login/{provider}[/callback]
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  LoginService   │ ← state, 계정 등록
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐      ┌──────────────────────┐
//! │  OpenIdClient   │ ───► │ OpenID 프로바이더     │
//! └─────────────────┘      └──────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 계정 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use openid_login_backend::config::EnvConfigSource;
//! use openid_login_backend::services::auth::{OpenIdClient, RequestContext, generate_token};
//!
//! let ctx = RequestContext::background();
//! let client = OpenIdClient::load(&EnvConfigSource, "google", reqwest::Client::new(), &ctx).await?;
//!
//! let state = generate_token(32)?;
//! let url = client.generate_login_url(&state);
//! ```

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
