//! # 로그인 서비스
//!
//! HTTP 핸들러와 `OpenIdClient` 사이에서 로그인 시도를 조율합니다.
//!
//! ```text
//! begin_login(provider)
//!   ├─ state 생성 (OS 난수)
//!   ├─ PendingLoginStore 에 (state, provider) 저장
//!   └─ 인증 URL 반환
//!
//! complete_login(provider, code, state)
//!   ├─ state 소비 (1회용, 만료/프로바이더 확인)
//!   ├─ exchange_code → verify_identity_token → get_subject
//!   ├─ fetch_verified_profile (userinfo 실패 시 ID 토큰 클레임 사용)
//!   └─ 계정 조회 → 갱신 또는 신규 등록
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::core::errors::OpenIdError;
use crate::core::registry::ProviderRegistry;
use crate::domain::dto::login::{LoginResultResponse, LoginUrlResponse};
use crate::domain::entities::accounts::{UserAccount, UserProfile};
use crate::domain::models::oauth::{IdentityToken, ProfileClaims};
use crate::errors::{AppError, AppResult};
use crate::repositories::accounts::AccountRepository;
use crate::services::auth::openid_client::OpenIdClient;
use crate::services::auth::pending_login::PendingLoginStore;
use crate::services::auth::request_context::RequestContext;
use crate::services::auth::token_generator::generate_token;

pub struct LoginService {
    registry: ProviderRegistry,
    pending: PendingLoginStore,
    accounts: Arc<dyn AccountRepository>,
    state_bytes: usize,
    request_timeout: Option<Duration>,
}

impl LoginService {
    /// # 인자
    ///
    /// * `registry` - 시작 시 로드된 프로바이더 클라이언트
    /// * `pending` - 발급된 state 보관소
    /// * `accounts` - 계정 저장소
    /// * `state_bytes` - state 에 사용할 난수 바이트 수
    pub fn new(
        registry: ProviderRegistry,
        pending: PendingLoginStore,
        accounts: Arc<dyn AccountRepository>,
        state_bytes: usize,
    ) -> Self {
        Self {
            registry,
            pending,
            accounts,
            state_bytes,
            request_timeout: None,
        }
    }

    /// 콜백 처리 중 프로바이더 호출 전체에 적용할 제한 시간
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// 요청 하나를 처리할 때 사용할 컨텍스트
    pub fn request_context(&self) -> RequestContext {
        match self.request_timeout {
            Some(timeout) => RequestContext::background().with_timeout(timeout),
            None => RequestContext::background(),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    fn client(&self, provider_id: &str) -> AppResult<Arc<OpenIdClient>> {
        self.registry.get(provider_id).ok_or_else(|| {
            AppError::NotFound(format!("등록되지 않은 프로바이더입니다: {}", provider_id))
        })
    }

    /// 새 state 를 발급하고 프로바이더 인증 URL 을 만듭니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 등록되지 않은 프로바이더
    /// * `AppError::InternalError` - OS 난수 소스 실패
    pub fn begin_login(&self, provider_id: &str) -> AppResult<LoginUrlResponse> {
        let client = self.client(provider_id)?;
        let state = generate_token(self.state_bytes)?;

        self.pending.issue(&state, provider_id);
        let login_url = client.generate_login_url(&state);

        log::debug!("🔗 {} 로그인 URL 발급", provider_id);

        Ok(LoginUrlResponse { login_url, state })
    }

    /// 프로바이더 콜백을 처리해 계정을 등록하거나 갱신합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 등록되지 않은 프로바이더
    /// * `AppError::AuthenticationError` - state 불일치, 코드 교환 실패, ID 토큰 누락/위조,
    ///   프로필 subject 불일치
    /// * `AppError::ConflictError` - 신규 계정의 이메일을 다른 계정이 사용 중
    /// * `AppError::GatewayTimeout` - 프로바이더 호출 시간 초과 또는 취소
    pub async fn complete_login(
        &self,
        provider_id: &str,
        code: &str,
        state: &str,
        ctx: &RequestContext,
    ) -> AppResult<LoginResultResponse> {
        let client = self.client(provider_id)?;

        self.pending.consume(state, provider_id).map_err(|rejection| {
            log::warn!("⚠️ {} 콜백 state 거부: {}", provider_id, rejection);
            AppError::AuthenticationError(rejection.to_string())
        })?;

        let token = client.exchange_code(code, ctx).await?;

        let identity = client
            .verify_identity_token(&token, ctx)
            .await
            .inspect_err(|e| {
                if let OpenIdError::IdentityTokenInvalid(reason) = e {
                    log::error!("🚨 {} ID 토큰 검증 실패: {}", provider_id, reason);
                }
            })?;

        let subject = client.get_subject(&identity).to_string();

        let profile = match client.fetch_verified_profile(&identity, &token, ctx).await {
            Ok(profile) => profile,
            Err(OpenIdError::ProfileFetch(reason)) => {
                log::warn!(
                    "⚠️ {} userinfo 조회 실패, ID 토큰 클레임 사용: {}",
                    provider_id,
                    reason
                );
                claims_from_identity(&identity)
            }
            Err(e) => return Err(e.into()),
        };

        let (account, created) = match self.accounts.find_by_subject(provider_id, &subject).await? {
            Some(mut account) => {
                account.update_profile(&profile);
                (self.accounts.update(account).await?, false)
            }
            None => (self.register(provider_id, &subject, &profile).await?, true),
        };

        log::info!(
            "✅ {} 로그인 완료: account={} created={} enrolled={}",
            provider_id,
            account.id,
            created,
            account.enrolled
        );

        Ok(LoginResultResponse::new(account, created))
    }

    async fn register(
        &self,
        provider_id: &str,
        subject: &str,
        profile: &ProfileClaims,
    ) -> AppResult<UserAccount> {
        if let Some(email) = profile.email.as_deref().filter(|e| !e.is_empty()) {
            if self.accounts.find_by_email(email).await?.is_some() {
                return Err(AppError::ConflictError(
                    "이미 사용 중인 이메일입니다".to_string(),
                ));
            }
        }

        let account = UserAccount::new(provider_id, subject, UserProfile::from(profile));
        self.accounts.insert(account).await
    }
}

/// 검증된 ID 토큰 페이로드에서 프로필 클레임을 읽습니다.
fn claims_from_identity(identity: &IdentityToken) -> ProfileClaims {
    let mut claims = identity.claims::<ProfileClaims>().unwrap_or_default();
    claims.sub = Some(identity.subject().to_string());
    claims
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::accounts::InMemoryAccountRepository;
    use chrono::Duration;

    fn service() -> LoginService {
        LoginService::new(
            ProviderRegistry::new(),
            PendingLoginStore::new(Duration::minutes(10)),
            Arc::new(InMemoryAccountRepository::new()),
            32,
        )
    }

    #[test]
    fn test_unknown_provider_is_not_found() {
        let result = service().begin_login("nope");

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_callback_for_unknown_provider_is_not_found() {
        let result = service()
            .complete_login("nope", "code", "state", &RequestContext::background())
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
