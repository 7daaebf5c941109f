//! # Core Module
//!
//! - [`errors`] - 인증 플로우 에러 체계 (`OpenIdError`)
//! - [`registry`] - 프로바이더별 인증 클라이언트 레지스트리 (`ProviderRegistry`)

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
