//! 진행 중인 로그인 시도의 state 보관소
//!
//! 로그인 URL 을 발급할 때 만든 state 를 프로바이더 ID 와 함께 저장하고,
//! 콜백에서 정확히 한 번만 소비합니다. 세션 타임아웃이 지난 state 는 거부됩니다.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
struct PendingLogin {
    provider_id: String,
    issued_at: DateTime<Utc>,
}

/// state 소비 실패 사유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateRejection {
    /// 발급한 적 없거나 이미 사용된 state
    Unknown,
    /// 세션 타임아웃 초과
    Expired,
    /// 다른 프로바이더로 발급된 state
    ProviderMismatch { expected: String },
}

impl std::fmt::Display for StateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateRejection::Unknown => write!(f, "알 수 없거나 이미 사용된 OAuth state"),
            StateRejection::Expired => write!(f, "만료된 OAuth state"),
            StateRejection::ProviderMismatch { expected } => {
                write!(f, "OAuth state 가 {} 프로바이더용으로 발급되었습니다", expected)
            }
        }
    }
}

pub struct PendingLoginStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, PendingLogin>>,
}

impl PendingLoginStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, state: &str, provider_id: &str) {
        self.issue_at(state, provider_id, Utc::now());
    }

    pub fn issue_at(&self, state: &str, provider_id: &str, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, pending| now - pending.issued_at <= self.ttl);
        entries.insert(
            state.to_string(),
            PendingLogin {
                provider_id: provider_id.to_string(),
                issued_at: now,
            },
        );
    }

    /// state 를 소비합니다. 성공/실패와 관계없이 같은 state 는 다시 사용할 수 없습니다.
    pub fn consume(&self, state: &str, provider_id: &str) -> Result<(), StateRejection> {
        self.consume_at(state, provider_id, Utc::now())
    }

    pub fn consume_at(
        &self,
        state: &str,
        provider_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StateRejection> {
        let pending = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(state)
            .ok_or(StateRejection::Unknown)?;

        if now - pending.issued_at > self.ttl {
            return Err(StateRejection::Expired);
        }

        if pending.provider_id != provider_id {
            return Err(StateRejection::ProviderMismatch {
                expected: pending.provider_id,
            });
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
