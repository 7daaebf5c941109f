use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::accounts::{UserAccount, UserProfile};

/// 로그인 시작 응답
#[derive(Debug, Clone, Serialize)]
pub struct LoginUrlResponse {
    /// 브라우저를 리다이렉트할 프로바이더 인증 페이지 URL
    pub login_url: String,
    /// 이번 로그인 시도의 state (콜백에서 정확히 일치해야 함)
    pub state: String,
}

/// 로그인 완료 응답
#[derive(Debug, Clone, Serialize)]
pub struct LoginResultResponse {
    pub account_id: Uuid,
    pub provider: String,
    pub subject: String,
    pub enrolled: bool,
    /// 이번 로그인으로 새 계정이 만들어졌는지 여부
    pub created: bool,
    pub profile: UserProfile,
    pub updated_at: DateTime<Utc>,
}

impl LoginResultResponse {
    pub fn new(account: UserAccount, created: bool) -> Self {
        let UserAccount {
            id,
            provider,
            subject,
            enrolled,
            profile,
            updated_at,
            ..
        } = account;

        Self {
            account_id: id,
            provider,
            subject,
            enrolled,
            created,
            profile,
            updated_at,
        }
    }
}
