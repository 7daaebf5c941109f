//! OIDC 디스커버리 문서 (`/.well-known/openid-configuration`)

use serde::{Deserialize, Serialize};

/// 디스커버리 문서 경로
pub const WELL_KNOWN_PATH: &str = "/.well-known/openid-configuration";

/// 프로바이더 메타데이터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo_endpoint: Option<String>,
    pub jwks_uri: String,
    /// 서명 알고리즘 목록 (없으면 `RS256` 으로 간주)
    #[serde(default)]
    pub id_token_signing_alg_values_supported: Vec<String>,
    #[serde(default)]
    pub scopes_supported: Vec<String>,
}

impl ProviderMetadata {
    /// 이슈어 URL 로부터 디스커버리 문서 URL 을 만듭니다.
    pub fn discovery_url(issuer_url: &str) -> String {
        format!("{}{}", issuer_url.trim_end_matches('/'), WELL_KNOWN_PATH)
    }
}
