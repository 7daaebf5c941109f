//! # JWKS (JSON Web Key Set) 조회 및 키 회전
//!
//! 프로바이더의 서명 공개키 집합을 조회하고, 검증에 사용할 불변 스냅샷으로 보관합니다.
//!
//! ## 동시성 모델
//!
//! ```text
//! verify ──► snapshot() ──► Arc<KeySet> (읽기 전용, 복제 비용 = 포인터 복사)
//!                │
//!     kid 불일치 / 서명 실패
//!                ▼
//!          refresh_after(seen) ──► 단일 비행(single flight) 뮤텍스
//!                │                    ├─ 다른 호출이 이미 갱신함 → 새 스냅샷 반환
//!                │                    └─ JWKS 재조회 → 새 KeySet 으로 포인터 교체
//!                ▼
//!           재검증 (1회)
//! ```
//!
//! 키 집합은 제자리에서 수정되지 않습니다. 갱신은 항상 새 `KeySet` 을 만들어
//! `Arc` 포인터를 교체하므로, 진행 중인 검증은 자신이 잡은 스냅샷을 끝까지 사용합니다.

use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use jsonwebtoken::{Algorithm, DecodingKey};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::core::errors::{OpenIdError, OpenIdResult};
use crate::services::auth::request_context::{RequestContext, transport_error};

/// 프로바이더가 반환하는 JWKS 문서
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JwkDocument {
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

/// 개별 JSON Web Key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[serde(default, rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// RSA modulus (base64url)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent (base64url)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

/// 키 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Rsa,
    Ec,
}

impl KeyFamily {
    /// 이 종류의 키로 검증할 수 있는 알고리즘인지 여부
    pub fn supports(self, alg: Algorithm) -> bool {
        match self {
            KeyFamily::Rsa => matches!(
                alg,
                Algorithm::RS256
                    | Algorithm::RS384
                    | Algorithm::RS512
                    | Algorithm::PS256
                    | Algorithm::PS384
                    | Algorithm::PS512
            ),
            KeyFamily::Ec => matches!(alg, Algorithm::ES256 | Algorithm::ES384),
        }
    }
}

/// 검증에 사용할 준비가 된 공개키
#[derive(Clone)]
pub struct VerificationKey {
    pub kid: Option<String>,
    pub family: KeyFamily,
    pub alg: Option<Algorithm>,
    pub key: DecodingKey,
}

impl VerificationKey {
    /// JWK 를 검증 키로 변환합니다. 서명 용도가 아니거나 지원하지 않는 키는 `None` 입니다.
    pub fn from_jwk(jwk: &Jwk) -> Option<Self> {
        if jwk.use_.as_deref().is_some_and(|usage| usage != "sig") {
            return None;
        }

        let alg = match jwk.alg.as_deref() {
            Some(name) => Some(Algorithm::from_str(name).ok()?),
            None => None,
        };

        let (family, key) = match jwk.kty.as_str() {
            "RSA" => {
                let key =
                    DecodingKey::from_rsa_components(jwk.n.as_deref()?, jwk.e.as_deref()?).ok()?;
                (KeyFamily::Rsa, key)
            }
            "EC" => {
                let key =
                    DecodingKey::from_ec_components(jwk.x.as_deref()?, jwk.y.as_deref()?).ok()?;
                (KeyFamily::Ec, key)
            }
            _ => return None,
        };

        if alg.is_some_and(|alg| !family.supports(alg)) {
            return None;
        }

        Some(Self {
            kid: jwk.kid.clone(),
            family,
            alg,
            key,
        })
    }

    fn accepts(&self, kid: Option<&str>, alg: Algorithm) -> bool {
        let kid_matches = match kid {
            Some(kid) => self.kid.as_deref() == Some(kid),
            None => true,
        };
        kid_matches && self.family.supports(alg) && self.alg.is_none_or(|own| own == alg)
    }
}

/// 불변 키 집합 스냅샷
#[derive(Clone, Default)]
pub struct KeySet {
    keys: Vec<VerificationKey>,
}

impl KeySet {
    pub fn new(keys: Vec<VerificationKey>) -> Self {
        Self { keys }
    }

    /// JWKS 문서에서 사용 가능한 서명 키만 골라 키 집합을 만듭니다.
    pub fn from_document(document: &JwkDocument) -> Self {
        let keys = document
            .keys
            .iter()
            .filter_map(|jwk| {
                let key = VerificationKey::from_jwk(jwk);
                if key.is_none() {
                    log::warn!(
                        "지원하지 않는 JWK 를 건너뜁니다 (kty: {}, kid: {:?})",
                        jwk.kty,
                        jwk.kid
                    );
                }
                key
            })
            .collect();

        Self { keys }
    }

    /// 토큰 헤더의 `kid`/`alg` 로 검증에 사용할 수 있는 후보 키
    pub fn candidates(&self, kid: Option<&str>, alg: Algorithm) -> Vec<&VerificationKey> {
        self.keys.iter().filter(|key| key.accepts(kid, alg)).collect()
    }

    pub fn key_ids(&self) -> Vec<&str> {
        self.keys.iter().filter_map(|key| key.kid.as_deref()).collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// 원격 JWKS 엔드포인트에 묶인 키 저장소
pub struct RemoteKeySet {
    jwks_uri: String,
    http: Client,
    current: RwLock<Arc<KeySet>>,
    refresh_lock: Mutex<()>,
}

impl RemoteKeySet {
    /// 최초 키 집합을 조회합니다. 로딩 단계이므로 실패는 `Discovery` 에러입니다.
    pub async fn fetch(http: Client, jwks_uri: &str, ctx: &RequestContext) -> OpenIdResult<Self> {
        let keys = fetch_key_set(&http, jwks_uri, ctx, OpenIdError::Discovery).await?;
        log::info!("🔑 JWKS 로드 완료: {} ({}개 키)", jwks_uri, keys.len());
        Ok(Self::with_keys(http, jwks_uri, keys))
    }

    /// 이미 확보한 키 집합으로 저장소를 만듭니다.
    pub fn with_keys(http: Client, jwks_uri: &str, keys: KeySet) -> Self {
        Self {
            jwks_uri: jwks_uri.to_string(),
            http,
            current: RwLock::new(Arc::new(keys)),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    /// 현재 키 집합 스냅샷
    pub fn snapshot(&self) -> Arc<KeySet> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `seen` 스냅샷이 오래되었다고 판단될 때 키 집합을 갱신합니다.
    ///
    /// 동시에 여러 검증이 갱신을 요청하면 한 번만 조회하고,
    /// 나머지는 이미 교체된 스냅샷을 받습니다.
    pub async fn refresh_after(
        &self,
        seen: &Arc<KeySet>,
        ctx: &RequestContext,
    ) -> OpenIdResult<Arc<KeySet>> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.snapshot();
        if !Arc::ptr_eq(&current, seen) {
            return Ok(current);
        }

        let fresh = Arc::new(
            fetch_key_set(&self.http, &self.jwks_uri, ctx, OpenIdError::IdentityTokenInvalid)
                .await?,
        );

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = fresh.clone();
        log::info!("🔄 JWKS 갱신: {} ({}개 키)", self.jwks_uri, fresh.len());

        Ok(fresh)
    }
}

async fn fetch_key_set(
    http: &Client,
    jwks_uri: &str,
    ctx: &RequestContext,
    stage: fn(String) -> OpenIdError,
) -> OpenIdResult<KeySet> {
    let document = ctx
        .run(async {
            let response = http
                .get(jwks_uri)
                .send()
                .await
                .map_err(|e| transport_error(e, stage, "JWKS"))?;

            if !response.status().is_success() {
                let status = response.status();
                return Err(stage(format!("JWKS 조회 실패 ({})", status)));
            }

            response
                .json::<JwkDocument>()
                .await
                .map_err(|e| transport_error(e, stage, "JWKS 파싱"))
        })
        .await?;

    Ok(KeySet::from_document(&document))
}
