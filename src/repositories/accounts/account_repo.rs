//! 사용자 계정 저장소
//!
//! 로그인 서비스는 `AccountRepository` 트레이트에만 의존하므로
//! 영속 계층은 교체할 수 있습니다. 기본 구현은 프로세스 메모리에 보관하는
//! `InMemoryAccountRepository` 입니다.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::accounts::UserAccount;
use crate::errors::{AppError, AppResult};

/// 계정 저장소 인터페이스
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// `(provider, subject)` 로 계정을 조회합니다.
    async fn find_by_subject(&self, provider: &str, subject: &str)
    -> AppResult<Option<UserAccount>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>>;

    /// 새 계정을 저장합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 같은 이메일 또는 같은 `(provider, subject)` 계정이 이미 있음
    async fn insert(&self, account: UserAccount) -> AppResult<UserAccount>;

    /// 기존 계정을 덮어씁니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 해당 ID 의 계정이 없음
    /// * `AppError::ConflictError` - 변경된 이메일을 다른 계정이 사용 중
    async fn update(&self, account: UserAccount) -> AppResult<UserAccount>;

    /// 계정을 삭제합니다. 삭제되었으면 `true`.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// 메모리 기반 계정 저장소
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<Uuid, UserAccount>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.accounts.read().await.len()
    }
}

fn email_taken(accounts: &HashMap<Uuid, UserAccount>, account: &UserAccount) -> bool {
    let Some(email) = account.profile.email.as_deref() else {
        return false;
    };

    accounts
        .values()
        .any(|other| other.id != account.id && other.profile.email.as_deref() == Some(email))
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_subject(
        &self,
        provider: &str,
        subject: &str,
    ) -> AppResult<Option<UserAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.provider == provider && account.subject == subject)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.profile.email.as_deref() == Some(email))
            .cloned())
    }

    async fn insert(&self, account: UserAccount) -> AppResult<UserAccount> {
        let mut accounts = self.accounts.write().await;

        if accounts
            .values()
            .any(|other| other.provider == account.provider && other.subject == account.subject)
        {
            return Err(AppError::ConflictError(
                "이미 등록된 프로바이더 계정입니다".to_string(),
            ));
        }

        if email_taken(&accounts, &account) {
            return Err(AppError::ConflictError(
                "이미 사용 중인 이메일입니다".to_string(),
            ));
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: UserAccount) -> AppResult<UserAccount> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(&account.id) {
            return Err(AppError::NotFound(format!("계정을 찾을 수 없습니다: {}", account.id)));
        }

        if email_taken(&accounts, &account) {
            return Err(AppError::ConflictError(
                "이미 사용 중인 이메일입니다".to_string(),
            ));
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.accounts.write().await.remove(&id).is_some())
    }
}
