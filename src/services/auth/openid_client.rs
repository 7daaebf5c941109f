//! # OpenID Connect 인증 플로우 컨트롤러
//!
//! 프로바이더 하나에 대한 Authorization Code 플로우 전체를 담당합니다.
//!
//! ## 플로우
//!
//! ```text
//! 1. generate_login_url(state)       → 브라우저를 프로바이더 인증 페이지로 리다이렉트
//! 2. 프로바이더 → /api/v1/login/{provider}/callback?code=...&state=...
//! 3. exchange_code(code)             → OAuthToken (access_token + id_token)
//! 4. verify_identity_token(token)    → IdentityToken (서명/클레임 검증 완료)
//! 5. get_subject(identity)           → 프로바이더의 사용자 영구 식별자
//! 6. fetch_profile(token)            → 이메일, 이름 등 프로필 클레임
//! ```
//!
//! 클라이언트는 생성 이후 변경되지 않으며 `Arc` 로 공유됩니다.
//! 모든 연산은 서로 독립적이고 몇 번이든 호출할 수 있습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let ctx = RequestContext::background().with_timeout(Duration::from_secs(10));
//! let client = OpenIdClient::load(&EnvConfigSource, "google", http, &ctx).await?;
//!
//! let state = generate_token(32)?;
//! let url = client.generate_login_url(&state);
//!
//! // 콜백에서
//! let token = client.exchange_code(&code, &ctx).await?;
//! let identity = client.verify_identity_token(&token, &ctx).await?;
//! let subject = client.get_subject(&identity);
//! ```

use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::{Map, Value};

use crate::config::{ConfigSource, ProviderSettings};
use crate::core::errors::{OpenIdError, OpenIdResult};
use crate::domain::models::oauth::{
    DEFAULT_SCOPES, IdentityToken, OAuthToken, ProfileClaims, ProviderConfig, ProviderMetadata,
};
use crate::services::auth::discovery::discover;
use crate::services::auth::jwks::RemoteKeySet;
use crate::services::auth::request_context::{RequestContext, transport_error};
use crate::services::auth::verifier::IdTokenVerifier;

/// 프로바이더별 인증 클라이언트
pub struct OpenIdClient {
    config: ProviderConfig,
    metadata: ProviderMetadata,
    verifier: IdTokenVerifier,
    http: Client,
}

impl OpenIdClient {
    /// 설정 소스에서 프로바이더 설정을 읽고 디스커버리를 수행해 클라이언트를 만듭니다.
    ///
    /// # 인자
    ///
    /// * `source` - `auth.<provider_id>.*`, `server.host` 키를 제공하는 설정 소스
    /// * `provider_id` - 프로바이더 식별자 (예: `google`)
    /// * `http` - 공유 HTTP 클라이언트
    /// * `ctx` - 디스커버리/JWKS 조회에 적용할 타임아웃과 취소 신호
    ///
    /// # Errors
    ///
    /// * `OpenIdError::Discovery` - 필수 설정 누락, 메타데이터/JWKS 조회 실패, issuer 불일치
    /// * `OpenIdError::Cancelled` / `OpenIdError::DeadlineExceeded`
    pub async fn load(
        source: &dyn ConfigSource,
        provider_id: &str,
        http: Client,
        ctx: &RequestContext,
    ) -> OpenIdResult<Self> {
        let settings = ProviderSettings::load(source, provider_id)?;
        Self::discover(settings, http, ctx).await
    }

    /// 검증된 설정으로 디스커버리를 수행합니다.
    pub async fn discover(
        settings: ProviderSettings,
        http: Client,
        ctx: &RequestContext,
    ) -> OpenIdResult<Self> {
        let metadata = discover(&http, &settings.issuer_url, ctx).await?;
        let keys = RemoteKeySet::fetch(http.clone(), &metadata.jwks_uri, ctx).await?;

        let config = ProviderConfig {
            provider_id: settings.provider_id.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_url: settings.redirect_url(),
            auth_url: settings
                .auth_url
                .clone()
                .unwrap_or_else(|| metadata.authorization_endpoint.clone()),
            token_url: settings
                .token_url
                .clone()
                .unwrap_or_else(|| metadata.token_endpoint.clone()),
            issuer_url: settings.issuer_url.clone(),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        let verifier = IdTokenVerifier::new(
            &metadata.issuer,
            &config.client_id,
            &metadata.id_token_signing_alg_values_supported,
            Arc::new(keys),
        );

        log::info!(
            "✅ OpenID 프로바이더 로드 완료: {} (issuer: {})",
            config.provider_id,
            metadata.issuer
        );

        Ok(Self {
            config,
            metadata,
            verifier,
            http,
        })
    }

    pub fn provider_id(&self) -> &str {
        &self.config.provider_id
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    pub fn verifier(&self) -> &IdTokenVerifier {
        &self.verifier
    }

    /// 프로바이더 인증 페이지 URL 을 만듭니다.
    ///
    /// `state` 는 퍼센트 인코딩되어 그대로 실리므로, 콜백에서 디코딩하면
    /// 바이트 단위로 동일한 값이 돌아옵니다.
    pub fn generate_login_url(&self, state: &str) -> String {
        let scope = self.config.scope_param();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", state),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let separator = if self.config.auth_url.contains('?') {
            '&'
        } else {
            '?'
        };

        format!("{}{}{}", self.config.auth_url, separator, query_string)
    }

    /// 인증 코드를 토큰으로 교환합니다.
    ///
    /// 코드는 1회용이므로 실패해도 재시도하지 않습니다.
    ///
    /// # Errors
    ///
    /// * `OpenIdError::TokenExchange` - 네트워크 실패, 에러 상태, `error` 응답,
    ///   `access_token` 누락, JSON 파싱 실패
    /// * `OpenIdError::Cancelled` / `OpenIdError::DeadlineExceeded`
    pub async fn exchange_code(&self, code: &str, ctx: &RequestContext) -> OpenIdResult<OAuthToken> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let body = ctx
            .run(async {
                let response = self
                    .http
                    .post(&self.config.token_url)
                    .header(ACCEPT, "application/json")
                    .form(&params)
                    .send()
                    .await
                    .map_err(|e| transport_error(e, OpenIdError::TokenExchange, "토큰"))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(OpenIdError::TokenExchange(format!(
                        "토큰 교환 실패 ({}): {}",
                        status, error_text
                    )));
                }

                response
                    .json::<Map<String, Value>>()
                    .await
                    .map_err(|e| transport_error(e, OpenIdError::TokenExchange, "토큰 응답 파싱"))
            })
            .await?;

        if let Some(error) = body.get("error") {
            let description = body
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(OpenIdError::TokenExchange(format!(
                "프로바이더 에러 응답: {} {}",
                error, description
            )));
        }

        OAuthToken::from_response(body, Utc::now()).ok_or_else(|| {
            OpenIdError::TokenExchange("토큰 응답에 access_token 이 없습니다".to_string())
        })
    }

    /// 토큰 응답의 `id_token` 을 검증합니다.
    ///
    /// # Errors
    ///
    /// * `OpenIdError::MissingIdentityToken` - `id_token` 이 없거나 문자열이 아님
    /// * `OpenIdError::IdentityTokenInvalid` - 서명 또는 클레임 검증 실패
    /// * `OpenIdError::Cancelled` / `OpenIdError::DeadlineExceeded` - 키 갱신 중 중단
    pub async fn verify_identity_token(
        &self,
        token: &OAuthToken,
        ctx: &RequestContext,
    ) -> OpenIdResult<IdentityToken> {
        let raw = token
            .raw_id_token()
            .ok_or(OpenIdError::MissingIdentityToken)?;

        self.verifier.verify(raw, ctx).await
    }

    /// 검증된 ID 토큰의 subject
    pub fn get_subject<'a>(&self, identity: &'a IdentityToken) -> &'a str {
        identity.subject()
    }

    /// userinfo 엔드포인트에서 프로필 클레임을 조회합니다.
    ///
    /// 응답에 없는 필드는 `None` 으로 남습니다.
    ///
    /// # Errors
    ///
    /// * `OpenIdError::ProfileFetch` - 만료된 액세스 토큰, userinfo 엔드포인트 없음,
    ///   네트워크/HTTP 실패, 잘못된 JSON
    /// * `OpenIdError::Cancelled` / `OpenIdError::DeadlineExceeded`
    pub async fn fetch_profile(
        &self,
        token: &OAuthToken,
        ctx: &RequestContext,
    ) -> OpenIdResult<ProfileClaims> {
        if !token.is_valid() {
            return Err(OpenIdError::ProfileFetch(
                "액세스 토큰이 만료되었습니다".to_string(),
            ));
        }

        let endpoint = self.metadata.userinfo_endpoint.as_deref().ok_or_else(|| {
            OpenIdError::ProfileFetch(format!(
                "{} 프로바이더는 userinfo 엔드포인트를 제공하지 않습니다",
                self.config.provider_id
            ))
        })?;

        ctx.run(async {
            let response = self
                .http
                .get(endpoint)
                .bearer_auth(&token.access_token)
                .send()
                .await
                .map_err(|e| transport_error(e, OpenIdError::ProfileFetch, "사용자 정보"))?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                return Err(OpenIdError::ProfileFetch(format!(
                    "사용자 정보 조회 실패 ({}): {}",
                    status, error_text
                )));
            }

            response
                .json::<ProfileClaims>()
                .await
                .map_err(|e| transport_error(e, OpenIdError::ProfileFetch, "사용자 정보 파싱"))
        })
        .await
    }

    /// 프로필을 조회하고 userinfo 의 `sub` 가 ID 토큰의 subject 와 같은지 확인합니다.
    ///
    /// # Errors
    ///
    /// * `fetch_profile` 의 모든 에러
    /// * `OpenIdError::ProfileFetch` - userinfo 응답에 `sub` 가 없음
    /// * `OpenIdError::ProfileSubjectMismatch` - `sub` 가 다름
    pub async fn fetch_verified_profile(
        &self,
        identity: &IdentityToken,
        token: &OAuthToken,
        ctx: &RequestContext,
    ) -> OpenIdResult<ProfileClaims> {
        let profile = self.fetch_profile(token, ctx).await?;

        match profile.sub.as_deref() {
            None => Err(OpenIdError::ProfileFetch(
                "userinfo 응답에 sub 가 없습니다".to_string(),
            )),
            Some(actual) if actual != identity.subject() => {
                Err(OpenIdError::ProfileSubjectMismatch {
                    expected: identity.subject().to_string(),
                    actual: actual.to_string(),
                })
            }
            Some(_) => Ok(profile),
        }
    }
}
