//! # Domain Layer Module
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - 사용자 계정 엔티티
//! ├── dto       - 로그인 요청/응답
//! └── models    - OpenID Connect 프로토콜 모델 (토큰, 클레임, 디스커버리)
//! ```

pub mod dto;
pub mod entities;
pub mod models;

pub use dto::*;
pub use entities::*;
pub use models::*;
