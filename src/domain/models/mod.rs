//! # Domain Models Module
//!
//! 외부 시스템(OpenID 프로바이더)과 주고받는 값 객체들입니다.
//! 엔티티와 달리 저장되지 않으며 요청 처리 범위 안에서만 존재합니다.

pub mod oauth;

pub use oauth::*;
