//! # OAuth 2.0 토큰 모델
//!
//! 토큰 엔드포인트의 `authorization_code` 그랜트 응답을 표현합니다.
//! 표준 필드 외의 프로바이더별 필드(`id_token`, `scope` 등)는 `extra` 에 그대로 보존됩니다.
//!
//! `extra` 에 담긴 `id_token` 은 검증 전의 원시 문자열일 뿐이며,
//! 반드시 `OpenIdClient::verify_identity_token` 을 거쳐야 신뢰할 수 있습니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 표준 ID 토큰 필드 이름
pub const ID_TOKEN_FIELD: &str = "id_token";

/// 토큰 엔드포인트에서 발급받은 OAuth 2.0 토큰
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
    /// 액세스 토큰 만료 시각 (`expires_in` 이 없으면 `None`)
    pub expiry: Option<DateTime<Utc>>,
    /// 표준 필드를 제외한 나머지 응답 필드
    pub extra: Map<String, Value>,
}

impl OAuthToken {
    /// 토큰 엔드포인트 JSON 응답 본문으로부터 토큰을 만듭니다.
    ///
    /// `issued_at` 은 `expires_in` 을 절대 시각으로 바꾸는 기준 시각입니다.
    /// `access_token` 이 없거나 문자열이 아니면 `None` 을 반환합니다.
    pub fn from_response(mut body: Map<String, Value>, issued_at: DateTime<Utc>) -> Option<Self> {
        let access_token = match body.remove("access_token") {
            Some(Value::String(token)) if !token.is_empty() => token,
            _ => return None,
        };

        let token_type = match body.remove("token_type") {
            Some(Value::String(kind)) => kind,
            _ => "Bearer".to_string(),
        };

        let refresh_token = match body.remove("refresh_token") {
            Some(Value::String(token)) if !token.is_empty() => Some(token),
            _ => None,
        };

        // 일부 프로바이더는 expires_in 을 문자열로 보냅니다.
        let expires_in = match body.remove("expires_in") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.parse::<i64>().ok(),
            _ => None,
        };

        let expiry = expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| issued_at + Duration::seconds(secs));

        Some(Self {
            access_token,
            token_type,
            refresh_token,
            expiry,
            extra: body,
        })
    }

    /// 프로바이더별 추가 필드를 조회합니다.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// 검증되지 않은 원시 ID 토큰 문자열
    ///
    /// 필드가 없거나 문자열이 아니면 `None` 입니다.
    pub fn raw_id_token(&self) -> Option<&str> {
        self.extra(ID_TOKEN_FIELD).and_then(Value::as_str)
    }

    /// 액세스 토큰이 비어있지 않고 만료되지 않았는지 확인합니다.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && self.expiry.is_none_or(|expiry| expiry > now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expiry", &self.expiry)
            .field("extra_fields", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}
