//! # OpenID Connect 도메인 모델
//!
//! 인증 플로우에서 주고받는 값 타입들입니다.
//!
//! - [`oauth_token`] - 토큰 엔드포인트 응답 (`OAuthToken`)
//! - [`identity_token`] - 검증된 ID 토큰 (`IdentityToken`)
//! - [`profile_claims`] - userinfo 프로필 클레임 (`ProfileClaims`)
//! - [`provider_metadata`] - 디스커버리 문서 (`ProviderMetadata`)
//! - [`provider_config`] - 클라이언트 설정 (`ProviderConfig`)

pub mod identity_token;
pub mod oauth_token;
pub mod profile_claims;
pub mod provider_config;
pub mod provider_metadata;

pub use identity_token::*;
pub use oauth_token::*;
pub use profile_claims::*;
pub use provider_config::*;
pub use provider_metadata::*;
