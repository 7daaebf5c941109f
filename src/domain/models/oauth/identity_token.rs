//! 검증된 OpenID Connect ID 토큰 모델

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `aud` 클레임: 단일 문자열 또는 문자열 배열
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, client_id: &str) -> bool {
        match self {
            Audience::One(aud) => aud == client_id,
            Audience::Many(auds) => auds.iter().any(|aud| aud == client_id),
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            Audience::One(aud) => vec![aud],
            Audience::Many(auds) => auds,
        }
    }
}

/// 서명 검증 시 디코딩하는 표준 ID 토큰 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    pub sub: String,
    pub aud: Audience,
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,
    #[serde(deserialize_with = "numeric_date")]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// NumericDate (RFC 7519) 를 초 단위로 읽습니다. 소수 부분은 버립니다.
fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumericDate {
        Seconds(i64),
        Fractional(f64),
    }

    match NumericDate::deserialize(deserializer)? {
        NumericDate::Seconds(secs) => Ok(secs),
        NumericDate::Fractional(secs) if secs.is_finite() => Ok(secs.trunc() as i64),
        NumericDate::Fractional(secs) => Err(serde::de::Error::custom(format!(
            "잘못된 NumericDate: {}",
            secs
        ))),
    }
}

/// 서명과 클레임 검증을 통과한 ID 토큰
///
/// `OpenIdClient::verify_identity_token` 만이 이 타입을 생성할 수 있으므로,
/// 이 타입의 값이 존재한다는 것 자체가 검증을 통과했다는 뜻입니다.
#[derive(Debug, Clone)]
pub struct IdentityToken {
    issuer: String,
    subject: String,
    audience: Vec<String>,
    issued_at: DateTime<Utc>,
    expiry: DateTime<Utc>,
    nonce: Option<String>,
    claims: Value,
}

impl IdentityToken {
    pub(crate) fn new(
        issuer: String,
        subject: String,
        audience: Vec<String>,
        issued_at: DateTime<Utc>,
        expiry: DateTime<Utc>,
        nonce: Option<String>,
        claims: Value,
    ) -> Self {
        Self {
            issuer,
            subject,
            audience,
            issued_at,
            expiry,
            nonce,
            claims,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// 프로바이더가 부여한 사용자의 영구 식별자 (항상 비어있지 않음)
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expiry(&self) -> DateTime<Utc> {
        self.expiry
    }

    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// 검증된 페이로드 전체를 원하는 타입으로 디코딩합니다.
    ///
    /// 프로바이더별 추가 클레임(`email`, `name` 등)을 읽을 때 사용합니다.
    pub fn claims<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.claims.clone())
    }

    pub fn raw_claims(&self) -> &Value {
        &self.claims
    }
}
