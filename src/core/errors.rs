//! # OpenID Connect 프로토콜 에러 체계
//!
//! 인증 플로우 컨트롤러(`OpenIdClient`)와 그 하위 컴포넌트가 반환하는
//! 도메인 에러 타입입니다. 외부 라이브러리(`reqwest`, `jsonwebtoken`)의 에러 타입을
//! 그대로 노출하지 않고, 호출자가 분기할 수 있는 태그 기반 분류로 변환합니다.
//!
//! ## 에러 분류
//!
//! | 변형 | 의미 | 재시도 |
//! |------|------|--------|
//! | `Discovery` | 프로바이더 메타데이터/키 조회 실패, 필수 설정 누락 | 호출자가 백오프로 재시도 가능 |
//! | `TokenExchange` | 인증 코드 교환 실패 (재사용/만료 코드 포함) | 불가 (코드는 1회용) |
//! | `MissingIdentityToken` | 토큰 응답에 `id_token` 이 없음 | 불가 |
//! | `IdentityTokenInvalid` | 서명/클레임 검증 실패 | 불가, 반드시 인증 실패로 처리 |
//! | `ProfileFetch` | userinfo 조회 실패 | 호출자 판단 |
//! | `ProfileSubjectMismatch` | userinfo 의 `sub` 가 ID 토큰과 다름 | 불가 |
//! | `RandomSourceExhausted` | OS 난수 소스 실패 | 불가 (프로세스 수준 문제) |
//! | `Cancelled` / `DeadlineExceeded` | 호출자 취소 / 시간 초과 | 새 플로우로 재시작 |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! match client.verify_identity_token(&token, &ctx).await {
//!     Ok(identity) => { /* 인증 성공 */ }
//!     Err(OpenIdError::MissingIdentityToken) => { /* 프로바이더가 id_token 을 보내지 않음 */ }
//!     Err(OpenIdError::IdentityTokenInvalid(reason)) => { /* 위조/만료 토큰 */ }
//!     Err(other) => return Err(other.into()),
//! }
//! ```

use thiserror::Error;

/// OpenID Connect 인증 플로우 에러
#[derive(Error, Debug)]
pub enum OpenIdError {
    /// 프로바이더 디스커버리 실패 또는 필수 설정 누락
    ///
    /// 프로바이더 등록 시점(시작 시)에만 발생하며, 해당 프로바이더는 사용할 수 없습니다.
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// 인증 코드 → 토큰 교환 실패
    ///
    /// 네트워크 실패, HTTP 에러 상태, 잘못된 토큰 응답이 모두 여기에 해당합니다.
    /// 이미 사용된 코드나 만료된 코드를 프로바이더가 거부한 경우도 포함됩니다.
    #[error("Token exchange error: {0}")]
    TokenExchange(String),

    /// 토큰 응답에 ID 토큰 문자열이 없음
    #[error("Token response does not contain an id_token")]
    MissingIdentityToken,

    /// ID 토큰 서명 또는 클레임 검증 실패
    #[error("Identity token invalid: {0}")]
    IdentityTokenInvalid(String),

    /// userinfo 엔드포인트 조회 실패
    #[error("Profile fetch error: {0}")]
    ProfileFetch(String),

    /// userinfo 응답의 subject 가 검증된 ID 토큰의 subject 와 다름
    #[error("Profile subject mismatch: identity token has {expected}, userinfo returned {actual}")]
    ProfileSubjectMismatch { expected: String, actual: String },

    /// OS 난수 소스에서 바이트를 얻지 못함
    #[error("Secure random source exhausted: {0}")]
    RandomSourceExhausted(String),

    /// 토큰 길이가 0
    #[error("Token length must be positive, got {0}")]
    InvalidTokenLength(usize),

    /// 호출자가 요청을 취소함
    #[error("Request cancelled")]
    Cancelled,

    /// 호출자가 지정한 시간 또는 HTTP 클라이언트 타임아웃 초과
    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl OpenIdError {
    /// 취소/시간 초과처럼 프로토콜과 무관한 중단인지 여부
    pub fn is_interrupted(&self) -> bool {
        matches!(self, OpenIdError::Cancelled | OpenIdError::DeadlineExceeded)
    }
}

/// 인증 플로우 전용 Result 타입 별칭
pub type OpenIdResult<T> = Result<T, OpenIdError>;
