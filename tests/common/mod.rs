//! 통합 테스트용 스텁 OpenID 프로바이더
//!
//! wiremock 서버 위에 디스커버리, JWKS, 토큰, userinfo 엔드포인트를 올립니다.
//! 토큰 엔드포인트는 발급한 코드를 한 번만 교환해 주고, 재사용 시 `invalid_grant` 를 반환합니다.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use once_cell::sync::Lazy;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, pkcs1::DecodeRsaPrivateKey};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use openid_login_backend::config::MapConfigSource;

pub const PROVIDER_ID: &str = "stub";
pub const CLIENT_ID: &str = "client-123";
pub const CLIENT_SECRET: &str = "secret-456";
pub const APP_HOST: &str = "https://app.example.com";

pub const SIGNING_KEY: &str = include_str!("../fixtures/signing_key.pem");
pub const ROTATED_KEY: &str = include_str!("../fixtures/rotated_key.pem");
pub const ROGUE_KEY: &str = include_str!("../fixtures/rogue_key.pem");

static PUBLIC_COMPONENTS: Lazy<Mutex<HashMap<&'static str, (String, String)>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// PEM 개인키의 공개키를 JWK 로 만듭니다.
pub fn jwk(pem: &'static str, kid: &str) -> Value {
    let (n, e) = PUBLIC_COMPONENTS
        .lock()
        .unwrap()
        .entry(pem)
        .or_insert_with(|| {
            let public_key = RsaPrivateKey::from_pkcs1_pem(pem).unwrap().to_public_key();
            (
                general_purpose::URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
                general_purpose::URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
            )
        })
        .clone();

    json!({
        "kty": "RSA",
        "use": "sig",
        "alg": "RS256",
        "kid": kid,
        "n": n,
        "e": e
    })
}

pub fn sign(pem: &str, kid: &str, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(&header, claims, &EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap()).unwrap()
}

struct TokenEndpoint {
    grants: Arc<Mutex<HashMap<String, Value>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl Respond for TokenEndpoint {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let form: HashMap<String, String> = String::from_utf8_lossy(&request.body)
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| {
                let decode = |s: &str| urlencoding::decode(&s.replace('+', " ")).unwrap().into_owned();
                (decode(k), decode(v))
            })
            .collect();

        let template = if form.get("grant_type").map(String::as_str) != Some("authorization_code")
            || form.get("client_id").map(String::as_str) != Some(CLIENT_ID)
            || form.get("client_secret").map(String::as_str) != Some(CLIENT_SECRET)
        {
            ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"}))
        } else {
            let code = form.get("code").cloned().unwrap_or_default();
            match self.grants.lock().unwrap().remove(&code) {
                Some(body) => ResponseTemplate::new(200).set_body_json(body),
                None => ResponseTemplate::new(400).set_body_json(json!({
                    "error": "invalid_grant",
                    "error_description": "code already used or unknown"
                })),
            }
        };

        match *self.delay.lock().unwrap() {
            Some(delay) => template.set_delay(delay),
            None => template,
        }
    }
}

/// 테스트 중 바꿀 수 있는 응답
#[derive(Clone)]
struct Reply {
    status: u16,
    body: ReplyBody,
    delay: Option<Duration>,
}

#[derive(Clone)]
enum ReplyBody {
    Json(Value),
    Raw(String),
}

impl Reply {
    fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: ReplyBody::Json(body),
            delay: None,
        }
    }
}

struct SharedReply(Arc<Mutex<Reply>>);

impl Respond for SharedReply {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let reply = self.0.lock().unwrap().clone();
        let template = ResponseTemplate::new(reply.status);
        let template = match reply.body {
            ReplyBody::Json(body) => template.set_body_json(body),
            ReplyBody::Raw(body) => template.set_body_string(body),
        };

        match reply.delay {
            Some(delay) => template.set_delay(delay),
            None => template,
        }
    }
}

/// 스텁 OpenID 프로바이더
pub struct StubProvider {
    pub server: MockServer,
    grants: Arc<Mutex<HashMap<String, Value>>>,
    token_delay: Arc<Mutex<Option<Duration>>>,
    jwks: Arc<Mutex<Reply>>,
    userinfo: Arc<Mutex<Reply>>,
}

impl StubProvider {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let issuer = server.uri();

        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issuer": issuer,
                "authorization_endpoint": format!("{}/authorize", issuer),
                "token_endpoint": format!("{}/token", issuer),
                "userinfo_endpoint": format!("{}/userinfo", issuer),
                "jwks_uri": format!("{}/jwks", issuer),
                "id_token_signing_alg_values_supported": ["RS256"],
                "scopes_supported": ["openid", "email", "profile"]
            })))
            .mount(&server)
            .await;

        let jwks = Arc::new(Mutex::new(Reply::json(
            json!({ "keys": [jwk(SIGNING_KEY, "key1")] }),
        )));
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(SharedReply(jwks.clone()))
            .mount(&server)
            .await;

        let grants = Arc::new(Mutex::new(HashMap::new()));
        let token_delay = Arc::new(Mutex::new(None));
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(TokenEndpoint {
                grants: grants.clone(),
                delay: token_delay.clone(),
            })
            .mount(&server)
            .await;

        let userinfo = Arc::new(Mutex::new(Reply::json(json!({
            "sub": "abc123",
            "email": "jane@example.com",
            "given_name": "Jane",
            "family_name": "Doe",
            "nickname": "jd",
            "picture": "https://example.com/jane.png"
        }))));
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(SharedReply(userinfo.clone()))
            .mount(&server)
            .await;

        Self {
            server,
            grants,
            token_delay,
            jwks,
            userinfo,
        }
    }

    pub fn issuer(&self) -> String {
        self.server.uri()
    }

    pub fn config_source(&self) -> MapConfigSource {
        MapConfigSource::new()
            .with("server.host", APP_HOST)
            .with(format!("auth.{}.key", PROVIDER_ID), CLIENT_ID)
            .with(format!("auth.{}.secret", PROVIDER_ID), CLIENT_SECRET)
            .with(format!("auth.{}.endpoint.url", PROVIDER_ID), self.issuer())
    }

    /// 표준 ID 토큰 클레임
    pub fn claims(&self, subject: &str) -> Value {
        let now = Utc::now().timestamp();
        json!({
            "iss": self.issuer(),
            "sub": subject,
            "aud": CLIENT_ID,
            "iat": now,
            "exp": now + 3600,
            "email": "jane@example.com",
            "given_name": "Jane",
            "family_name": "Doe",
            "nickname": "jd"
        })
    }

    /// `code` 교환 시 돌려줄 토큰 응답을 등록합니다.
    pub fn issue_code(&self, code: &str, body: Value) {
        self.grants.lock().unwrap().insert(code.to_string(), body);
    }

    /// 주어진 ID 토큰을 담은 토큰 응답으로 `code` 를 등록합니다.
    pub fn issue_code_with_id_token(&self, code: &str, id_token: &str) {
        self.issue_code(
            code,
            json!({
                "access_token": format!("access-{}", code),
                "token_type": "Bearer",
                "expires_in": 3600,
                "id_token": id_token
            }),
        );
    }

    /// 기본 서명 키로 `sub` 를 가진 ID 토큰을 만들어 `code` 를 등록합니다.
    pub fn issue_login(&self, code: &str, subject: &str) {
        let id_token = sign(SIGNING_KEY, "key1", &self.claims(subject));
        self.issue_code_with_id_token(code, &id_token);
    }

    pub fn set_jwks(&self, keys: Vec<Value>) {
        self.jwks.lock().unwrap().body = ReplyBody::Json(json!({ "keys": keys }));
    }

    /// JWKS 응답을 지연시켜 동시 갱신이 겹치도록 합니다.
    pub fn set_jwks_delay(&self, delay: Duration) {
        self.jwks.lock().unwrap().delay = Some(delay);
    }

    pub fn set_userinfo(&self, body: Value) {
        *self.userinfo.lock().unwrap() = Reply::json(body);
    }

    /// userinfo 가 `status` 와 가공되지 않은 본문을 반환하게 합니다.
    pub fn set_userinfo_response(&self, status: u16, body: &str) {
        let mut reply = self.userinfo.lock().unwrap();
        reply.status = status;
        reply.body = ReplyBody::Raw(body.to_string());
    }

    pub fn set_token_delay(&self, delay: Duration) {
        *self.token_delay.lock().unwrap() = Some(delay);
    }

    pub async fn jwks_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == "/jwks")
            .count()
    }
}
