//! ID 토큰 서명 및 클레임 검증기
//!
//! 검증 순서:
//!
//! 1. 헤더 디코딩, 허용된 서명 알고리즘인지 확인 (`none`/HMAC 거부)
//! 2. `kid`/`alg` 로 후보 키 선택, 서명 검증
//! 3. 후보 키가 없거나 서명이 맞지 않으면 JWKS 를 한 번 갱신 후 재시도 (키 회전 대응)
//! 4. `iss`, `aud`, `exp`, `nbf` 검증 (시계 오차 허용)
//! 5. `iat` 가 허용 오차보다 미래이면 거부, `sub` 가 비어있으면 거부

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header};
use serde_json::Value;

use crate::core::errors::{OpenIdError, OpenIdResult};
use crate::domain::models::oauth::{IdTokenClaims, IdentityToken};
use crate::services::auth::jwks::{KeySet, RemoteKeySet};
use crate::services::auth::request_context::RequestContext;

/// 기본 시계 오차 허용 범위
pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(60);

/// 필수 등록 클레임
const REQUIRED_CLAIMS: [&str; 4] = ["exp", "iss", "aud", "sub"];

enum Attempt {
    Verified(Value),
    /// 현재 키 집합으로는 서명을 확인할 수 없음 (갱신 후 재시도 대상)
    StaleKeys(String),
    Rejected(String),
}

/// 특정 이슈어/클라이언트에 묶인 ID 토큰 검증기
pub struct IdTokenVerifier {
    issuer: String,
    client_id: String,
    algorithms: Vec<Algorithm>,
    keys: Arc<RemoteKeySet>,
    clock_skew: Duration,
}

impl IdTokenVerifier {
    /// # 인자
    ///
    /// * `issuer` - 디스커버리로 확인된 이슈어 (토큰의 `iss` 와 정확히 일치해야 함)
    /// * `client_id` - 토큰의 `aud` 에 포함되어야 하는 클라이언트 ID
    /// * `supported` - 프로바이더가 광고한 서명 알고리즘 목록 (비어있으면 RS256)
    /// * `keys` - 프로바이더 JWKS 저장소
    pub fn new(
        issuer: &str,
        client_id: &str,
        supported: &[String],
        keys: Arc<RemoteKeySet>,
    ) -> Self {
        Self {
            issuer: issuer.to_string(),
            client_id: client_id.to_string(),
            algorithms: allowed_algorithms(supported),
            keys,
            clock_skew: DEFAULT_CLOCK_SKEW,
        }
    }

    pub fn with_clock_skew(mut self, clock_skew: Duration) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn key_store(&self) -> &Arc<RemoteKeySet> {
        &self.keys
    }

    /// 원시 ID 토큰을 검증합니다.
    ///
    /// # Errors
    ///
    /// * `OpenIdError::IdentityTokenInvalid` - 형식, 서명, 클레임 중 하나라도 실패
    /// * `OpenIdError::Cancelled` / `OpenIdError::DeadlineExceeded` - 키 갱신 중 중단
    pub async fn verify(&self, raw: &str, ctx: &RequestContext) -> OpenIdResult<IdentityToken> {
        let header = decode_header(raw).map_err(|e| {
            OpenIdError::IdentityTokenInvalid(format!("잘못된 토큰 헤더: {}", e))
        })?;

        if !self.algorithms.contains(&header.alg) {
            return Err(OpenIdError::IdentityTokenInvalid(format!(
                "허용되지 않은 서명 알고리즘: {:?}",
                header.alg
            )));
        }

        let kid = header.kid.as_deref();
        let snapshot = self.keys.snapshot();

        let payload = match self.attempt(raw, kid, header.alg, &snapshot) {
            Attempt::Verified(payload) => payload,
            Attempt::Rejected(reason) => return Err(OpenIdError::IdentityTokenInvalid(reason)),
            Attempt::StaleKeys(reason) => {
                log::debug!("🔑 {} - JWKS 갱신 후 재검증", reason);

                let refreshed = self.keys.refresh_after(&snapshot, ctx).await.map_err(|e| {
                    if e.is_interrupted() {
                        e
                    } else {
                        OpenIdError::IdentityTokenInvalid(format!("{} (키 갱신 실패: {})", reason, e))
                    }
                })?;

                match self.attempt(raw, kid, header.alg, &refreshed) {
                    Attempt::Verified(payload) => payload,
                    Attempt::Rejected(reason) | Attempt::StaleKeys(reason) => {
                        return Err(OpenIdError::IdentityTokenInvalid(reason));
                    }
                }
            }
        };

        self.build_identity(payload)
    }

    fn validation(&self, alg: Algorithm) -> Validation {
        let mut validation = Validation::new(alg);
        validation.algorithms = vec![alg];
        validation.leeway = self.clock_skew.as_secs();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);
        validation
    }

    fn attempt(&self, raw: &str, kid: Option<&str>, alg: Algorithm, keys: &KeySet) -> Attempt {
        let candidates = keys.candidates(kid, alg);
        if candidates.is_empty() {
            return Attempt::StaleKeys(format!("일치하는 서명 키 없음 (kid: {:?})", kid));
        }

        let validation = self.validation(alg);
        for candidate in candidates {
            match decode::<Value>(raw, &candidate.key, &validation) {
                Ok(data) => return Attempt::Verified(data.claims),
                Err(e) if matches!(e.kind(), ErrorKind::InvalidSignature) => continue,
                // 서명 확인 후 발생하는 클레임 에러는 키를 바꿔도 달라지지 않음
                Err(e) => return Attempt::Rejected(describe(e.kind())),
            }
        }

        Attempt::StaleKeys("서명 검증 실패".to_string())
    }

    fn build_identity(&self, payload: Value) -> OpenIdResult<IdentityToken> {
        let claims: IdTokenClaims = serde_json::from_value(payload.clone())
            .map_err(|e| OpenIdError::IdentityTokenInvalid(format!("클레임 형식 오류: {}", e)))?;

        if claims.sub.is_empty() {
            return Err(OpenIdError::IdentityTokenInvalid(
                "sub 클레임이 비어있습니다".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let skew = self.clock_skew.as_secs() as i64;
        if claims.iat > now + skew {
            return Err(OpenIdError::IdentityTokenInvalid(format!(
                "iat 가 미래 시각입니다 ({})",
                claims.iat
            )));
        }

        let issued_at = timestamp(claims.iat, "iat")?;
        let expiry = timestamp(claims.exp, "exp")?;

        Ok(IdentityToken::new(
            claims.iss,
            claims.sub,
            claims.aud.into_vec(),
            issued_at,
            expiry,
            claims.nonce,
            payload,
        ))
    }
}

/// 광고된 알고리즘 중 비대칭 서명 알고리즘만 허용합니다.
fn allowed_algorithms(supported: &[String]) -> Vec<Algorithm> {
    let algorithms: Vec<Algorithm> = supported
        .iter()
        .filter_map(|name| name.parse::<Algorithm>().ok())
        .filter(|alg| {
            matches!(
                alg,
                Algorithm::RS256
                    | Algorithm::RS384
                    | Algorithm::RS512
                    | Algorithm::PS256
                    | Algorithm::PS384
                    | Algorithm::PS512
                    | Algorithm::ES256
                    | Algorithm::ES384
            )
        })
        .collect();

    if algorithms.is_empty() {
        vec![Algorithm::RS256]
    } else {
        algorithms
    }
}

fn timestamp(seconds: i64, claim: &str) -> OpenIdResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        OpenIdError::IdentityTokenInvalid(format!("{} 값이 범위를 벗어났습니다: {}", claim, seconds))
    })
}

fn describe(kind: &ErrorKind) -> String {
    match kind {
        ErrorKind::ExpiredSignature => "토큰이 만료되었습니다".to_string(),
        ErrorKind::ImmatureSignature => "토큰이 아직 유효하지 않습니다 (nbf)".to_string(),
        ErrorKind::InvalidIssuer => "issuer 불일치".to_string(),
        ErrorKind::InvalidAudience => "audience 에 클라이언트 ID 가 없습니다".to_string(),
        ErrorKind::MissingRequiredClaim(claim) => format!("필수 클레임 누락: {}", claim),
        other => format!("토큰 검증 실패: {:?}", other),
    }
}
