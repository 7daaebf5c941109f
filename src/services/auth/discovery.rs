//! OIDC 프로바이더 디스커버리 (`/.well-known/openid-configuration`)

use reqwest::Client;

use crate::core::errors::{OpenIdError, OpenIdResult};
use crate::domain::models::oauth::ProviderMetadata;
use crate::services::auth::request_context::{RequestContext, transport_error};

/// 이슈어 URL 에서 프로바이더 메타데이터를 조회합니다.
///
/// 문서의 `issuer` 가 설정된 이슈어 URL 과 정확히 일치하지 않으면 실패합니다.
/// 다른 프로바이더의 키로 서명된 토큰을 받아들이지 않기 위한 조건입니다.
///
/// # Errors
///
/// * `OpenIdError::Discovery` - HTTP 실패, 에러 상태, JSON 파싱 실패, issuer 불일치
/// * `OpenIdError::Cancelled` / `OpenIdError::DeadlineExceeded`
pub async fn discover(
    http: &Client,
    issuer_url: &str,
    ctx: &RequestContext,
) -> OpenIdResult<ProviderMetadata> {
    let discovery_url = ProviderMetadata::discovery_url(issuer_url);
    log::debug!("🔍 OIDC 디스커버리 요청: {}", discovery_url);

    let metadata = ctx
        .run(async {
            let response = http
                .get(&discovery_url)
                .send()
                .await
                .map_err(|e| transport_error(e, OpenIdError::Discovery, "디스커버리 문서"))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(OpenIdError::Discovery(format!(
                    "디스커버리 문서 조회 실패 ({}): {}",
                    status, body
                )));
            }

            response
                .json::<ProviderMetadata>()
                .await
                .map_err(|e| transport_error(e, OpenIdError::Discovery, "디스커버리 문서 파싱"))
        })
        .await?;

    if metadata.issuer != issuer_url {
        return Err(OpenIdError::Discovery(format!(
            "issuer 불일치: 설정값 {}, 디스커버리 문서 {}",
            issuer_url, metadata.issuer
        )));
    }

    Ok(metadata)
}
