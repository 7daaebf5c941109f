//! Login HTTP Handlers
//!
//! OpenID Connect Authorization Code 플로우의 HTTP 엔드포인트입니다.
//!
//! - `GET /api/v1/login/{provider}` - 인증 URL 과 state 발급
//! - `GET /api/v1/login/{provider}/callback` - 프로바이더 콜백 처리

use actix_web::{HttpResponse, get, web};

use crate::domain::dto::login::OAuthCallbackQuery;
use crate::errors::AppError;
use crate::services::auth::LoginService;

#[get("/{provider}")]
pub async fn login_url(
    path: web::Path<String>,
    service: web::Data<LoginService>,
) -> Result<HttpResponse, AppError> {
    let provider = path.into_inner();
    let response = service.begin_login(&provider)?;

    Ok(HttpResponse::Ok().json(response))
}

#[get("/{provider}/callback")]
pub async fn login_callback(
    path: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
    service: web::Data<LoginService>,
) -> Result<HttpResponse, AppError> {
    let provider = path.into_inner();

    // 사용자가 동의를 거부했거나 프로바이더 에러
    if let Some(error) = &query.error {
        let error_msg = query
            .error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("{} OAuth 에러: {} - {}", provider, error, error_msg);
        return Err(AppError::AuthenticationError(error_msg.to_string()));
    }

    if query.code.is_empty() {
        return Err(AppError::ValidationError(
            "인증 코드가 없습니다".to_string(),
        ));
    }

    let ctx = service.request_context();
    let result = service
        .complete_login(&provider, &query.code, &query.state, &ctx)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
