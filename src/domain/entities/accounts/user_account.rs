//! UserAccount Entity Implementation
//!
//! OpenID Connect 로그인으로 식별되는 사용자 계정입니다.
//! 계정은 `(provider, subject)` 쌍으로 식별되며, 프로필이 모두 채워졌을 때
//! 가입 완료(`enrolled`) 상태가 됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::models::oauth::ProfileClaims;

/// 사용자 프로필
///
/// 가입 완료 조건은 `validator` 규칙으로 표현됩니다.
/// 유효한 이메일과 비어있지 않은 이름, 성, 닉네임이 모두 있어야 합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserProfile {
    #[validate(required(message = "이메일이 필요합니다"), email(message = "유효한 이메일이 아닙니다"))]
    pub email: Option<String>,

    #[validate(required, length(min = 1, message = "이름이 비어있습니다"))]
    pub given_name: Option<String>,

    #[validate(required, length(min = 1, message = "성이 비어있습니다"))]
    pub family_name: Option<String>,

    #[validate(required, length(min = 1, message = "닉네임이 비어있습니다"))]
    pub nickname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

impl UserProfile {
    /// 프로바이더 클레임으로 갱신합니다. 클레임에 없는 필드는 기존 값을 유지합니다.
    pub fn merge(&mut self, claims: &ProfileClaims) {
        fn fill(target: &mut Option<String>, source: &Option<String>) {
            if let Some(value) = source.as_ref().filter(|v| !v.is_empty()) {
                *target = Some(value.clone());
            }
        }

        fill(&mut self.email, &claims.email);
        fill(&mut self.given_name, &claims.given_name);
        fill(&mut self.family_name, &claims.family_name);
        fill(&mut self.nickname, &claims.nickname);
        fill(&mut self.picture_url, &claims.picture_url);
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

impl From<&ProfileClaims> for UserProfile {
    fn from(claims: &ProfileClaims) -> Self {
        let mut profile = Self::default();
        profile.merge(claims);
        profile
    }
}

/// 사용자 계정 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    /// 로그인에 사용한 프로바이더 ID
    pub provider: String,
    /// 프로바이더가 부여한 사용자 식별자 (`sub`)
    pub subject: String,
    /// 가입 완료 여부
    pub enrolled: bool,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(provider: &str, subject: &str, profile: UserProfile) -> Self {
        let now = Utc::now();
        let enrolled = profile.is_complete();

        Self {
            id: Uuid::new_v4(),
            provider: provider.to_string(),
            subject: subject.to_string(),
            enrolled,
            profile,
            created_at: now,
            updated_at: now,
        }
    }

    /// 프로필을 갱신하고 가입 완료 여부를 다시 계산합니다.
    pub fn update_profile(&mut self, claims: &ProfileClaims) {
        self.profile.merge(claims);
        self.enrolled = self.profile.is_complete();
        self.updated_at = Utc::now();
    }

    pub fn is_enrolled(&self) -> bool {
        self.enrolled
    }
}
