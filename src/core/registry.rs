//! # Provider Registry
//!
//! 시작 시 설정된 프로바이더마다 `OpenIdClient` 를 한 번씩 만들어 보관합니다.
//!
//! ## 등록 과정
//!
//! ```text
//! AUTH_PROVIDERS=google,github
//!        │
//!        ├─ google → ProviderSettings::load → 디스커버리 → JWKS → ✓ 등록
//!        └─ github → 설정 누락 / 디스커버리 실패 → ✗ 로그 후 건너뜀
//! ```
//!
//! 프로바이더 하나의 실패는 그 프로바이더만 사용할 수 없게 만들며
//! 나머지 등록에는 영향을 주지 않습니다. 요청 처리 중에는 다시 시도하지 않습니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let registry = ProviderRegistry::initialize_all(
//!     &EnvConfigSource,
//!     &OAuthConfig::enabled_providers(),
//!     http,
//!     &RequestContext::background().with_timeout(Duration::from_secs(10)),
//! )
//! .await;
//!
//! let client = registry.get("google").ok_or(...)?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Client;

use crate::config::ConfigSource;
use crate::core::errors::OpenIdError;
use crate::services::auth::{OpenIdClient, RequestContext};
use crate::utils::display_terminal::{print_boxed_title, print_registry_summary, print_sub_task};

/// 프로바이더 ID → 인증 클라이언트
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    clients: BTreeMap<String, Arc<OpenIdClient>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 모든 프로바이더를 독립적으로 로드합니다.
    ///
    /// 실패한 프로바이더는 `log::error!` 로 기록하고 건너뜁니다.
    pub async fn initialize_all(
        source: &dyn ConfigSource,
        provider_ids: &[String],
        http: Client,
        ctx: &RequestContext,
    ) -> Self {
        print_boxed_title("🔄 LOADING OPENID PROVIDERS");

        let mut registry = Self::new();
        let mut skipped = 0;

        for provider_id in provider_ids {
            print_sub_task(provider_id, "Discovering...");

            match OpenIdClient::load(source, provider_id, http.clone(), ctx).await {
                Ok(client) => {
                    print_sub_task(provider_id, "✓ Loaded");
                    registry.insert(client);
                }
                Err(e) => {
                    skipped += 1;
                    print_sub_task(provider_id, "✗ Skipped");
                    log_load_failure(provider_id, &e);
                }
            }
        }

        print_registry_summary(registry.len(), skipped);
        registry
    }

    pub fn insert(&mut self, client: OpenIdClient) {
        self.clients
            .insert(client.provider_id().to_string(), Arc::new(client));
    }

    pub fn get(&self, provider_id: &str) -> Option<Arc<OpenIdClient>> {
        self.clients.get(provider_id).cloned()
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.clients.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

fn log_load_failure(provider_id: &str, error: &OpenIdError) {
    if error.is_interrupted() {
        log::error!("❌ {} 프로바이더 로드 중단: {}", provider_id, error);
    } else {
        log::error!("❌ {} 프로바이더를 사용할 수 없습니다: {}", provider_id, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfigSource;

    #[tokio::test]
    async fn test_misconfigured_provider_is_skipped() {
        // 필수 키가 없으므로 네트워크 호출 전에 실패함
        let source = MapConfigSource::new().with("server.host", "https://app.example.com");

        let registry = ProviderRegistry::initialize_all(
            &source,
            &["google".to_string()],
            Client::new(),
            &RequestContext::background(),
        )
        .await;

        assert!(registry.is_empty());
        assert!(registry.get("google").is_none());
    }
}
