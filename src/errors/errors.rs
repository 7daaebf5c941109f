//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 백엔드 서비스를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고 
//! 일관된 에러 처리를 제공합니다.
//!
//! 인증 플로우의 `OpenIdError` 는 `From` 변환으로 이 타입에 매핑되어
//! 핸들러에서 `?` 로 바로 전파할 수 있습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn login_callback(...) -> Result<HttpResponse, AppError> {
//!     let token = client.exchange_code(&code, &ctx).await?;   // OpenIdError → AppError
//!     let identity = client.verify_identity_token(&token, &ctx).await?;
//!     Ok(HttpResponse::Ok().json(...))
//! }
//! ```

use thiserror::Error;

use crate::core::errors::OpenIdError;

/// 애플리케이션 전역 에러 타입
///
/// 백엔드 서비스에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),
    
    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),
    
    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),
    
    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
    
    /// 외부 서비스 에러 (500 Internal Server Error)
    #[error("External service error: {0}")]
    ExternalServiceError(String),
    
    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// 프로바이더 호출 시간 초과 또는 취소 (504 Gateway Timeout)
    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),
}

impl From<OpenIdError> for AppError {
    fn from(error: OpenIdError) -> Self {
        let message = error.to_string();
        match error {
            OpenIdError::Discovery(_) | OpenIdError::ProfileFetch(_) => {
                AppError::ExternalServiceError(message)
            }
            OpenIdError::TokenExchange(_)
            | OpenIdError::MissingIdentityToken
            | OpenIdError::IdentityTokenInvalid(_)
            | OpenIdError::ProfileSubjectMismatch { .. } => AppError::AuthenticationError(message),
            OpenIdError::RandomSourceExhausted(_) | OpenIdError::InvalidTokenLength(_) => {
                AppError::InternalError(message)
            }
            OpenIdError::Cancelled | OpenIdError::DeadlineExceeded => {
                AppError::GatewayTimeout(message)
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::http::StatusCode;
        
        let status = match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        
        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": self.to_string()
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;
