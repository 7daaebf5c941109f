//! 라우트 설정
//!
//! ```text
//! GET /health
//! GET /api/v1/login/{provider}
//! GET /api/v1/login/{provider}/callback
//! ```

use actix_web::web;
use serde_json::json;

use crate::handlers;
use crate::services::auth::LoginService;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_login_routes(cfg);
}

fn configure_login_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/login")
            .service(handlers::login::login_callback)
            .service(handlers::login::login_url),
    );
}

#[actix_web::get("/health")]
async fn health_check(service: web::Data<LoginService>) -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "providers": service.registry().provider_ids(),
    }))
}
