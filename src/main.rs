//! OpenID Connect 로그인 서비스 메인 애플리케이션
//!
//! 설정된 프로바이더를 디스커버리로 로드하고 Actix-web HTTP 서버를 구동합니다.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};
use env_logger::Env;
use log::{error, info, warn};

use openid_login_backend::config::{
    ConfigSource, EnvConfigSource, EnvFile, Environment, OAuthConfig, RateLimitConfig,
    ServerConfig,
};
use openid_login_backend::core::registry::ProviderRegistry;
use openid_login_backend::repositories::accounts::InMemoryAccountRepository;
use openid_login_backend::routes::configure_all_routes;
use openid_login_backend::services::auth::{LoginService, PendingLoginStore, RequestContext};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 파일 로드 결과는 로거 초기화 후 기록
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());
    let env_file = EnvFile::for_profile(&profile);
    let env_loaded = dotenv::from_filename(env_file);

    init_logging();

    info!("Current profile: {}", profile);
    match env_loaded {
        Ok(_) => info!("{} 파일 로드 됨", env_file),
        Err(e) => error!("{} 파일 로드 실패: {}", env_file, e),
    }

    info!("🚀 OpenID 로그인 서비스 시작중...");

    check_callback_host();

    let http_timeout = OAuthConfig::http_timeout();
    let http = reqwest::Client::builder()
        .timeout(http_timeout)
        .build()
        .map_err(|e| io::Error::other(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

    let providers = OAuthConfig::enabled_providers();
    if providers.is_empty() {
        warn!("⚠️ AUTH_PROVIDERS 가 비어있습니다. 로그인 가능한 프로바이더가 없습니다");
    }

    let registry = ProviderRegistry::initialize_all(
        &EnvConfigSource,
        &providers,
        http,
        &RequestContext::background().with_timeout(http_timeout),
    )
    .await;

    let login_service = LoginService::new(
        registry,
        PendingLoginStore::new(chrono::Duration::minutes(
            OAuthConfig::session_timeout_minutes(),
        )),
        Arc::new(InMemoryAccountRepository::new()),
        OAuthConfig::state_bytes(),
    )
    .with_request_timeout(http_timeout);

    info!("✅ 로그인 서비스 초기화 완료");

    start_http_server(web::Data::new(login_service)).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate limiting, CORS, 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패, 잘못된 rate limit 설정 또는 서버 실행 오류
async fn start_http_server(login_service: web::Data<LoginService>) -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 Login: http://{}/api/v1/login/{{provider}}", bind_address);

    // Rate Limiting 설정
    let rate_limit_config = RateLimitConfig::load();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "잘못된 rate limit 설정"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(login_service.clone())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(4)
    .run()
    .await
}

/// 로깅 시스템을 초기화합니다
///
/// ```bash
/// RUST_LOG=openid_login_backend::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// 스테이징/프로덕션에서 콜백 호스트가 HTTPS 가 아니면 경고합니다
fn check_callback_host() {
    let environment = Environment::current();
    let host = EnvConfigSource.get_string("server.host").unwrap_or_default();

    if environment.requires_https() && !host.starts_with("https://") {
        warn!(
            "⚠️ {:?} 환경의 SERVER_HOST 가 HTTPS 가 아닙니다: {}",
            environment, host
        );
    }
}

/// CORS 설정을 구성합니다
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}
