//! 네트워크 호출용 요청 컨텍스트
//!
//! 디스커버리, 코드 교환, 키 갱신, 프로필 조회 등 모든 네트워크 호출은
//! `RequestContext` 를 받아 호출자가 지정한 타임아웃과 취소 신호를 따릅니다.
//! 타임아웃은 `OpenIdError::DeadlineExceeded`, 취소는 `OpenIdError::Cancelled` 로
//! 반환되어 프로토콜 에러와 구분됩니다.
//!
//! ```rust,ignore
//! let cancel = CancellationToken::new();
//! let ctx = RequestContext::background()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_cancellation(cancel.clone());
//!
//! let token = client.exchange_code(&code, &ctx).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::errors::{OpenIdError, OpenIdResult};

/// 호출자 지정 타임아웃/취소 정보
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl RequestContext {
    /// 타임아웃과 취소 신호가 없는 컨텍스트
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// 주어진 future 를 타임아웃/취소 조건 아래에서 실행합니다.
    ///
    /// 취소가 이미 요청된 경우 future 를 폴링하지 않고 `Cancelled` 를 반환합니다.
    pub(crate) async fn run<F, T>(&self, fut: F) -> OpenIdResult<T>
    where
        F: Future<Output = OpenIdResult<T>>,
    {
        let bounded = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, fut)
                    .await
                    .map_err(|_| OpenIdError::DeadlineExceeded)?,
                None => fut.await,
            }
        };

        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(OpenIdError::Cancelled),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}

/// `reqwest` 전송 에러를 에러 체계로 변환합니다.
///
/// 클라이언트 타임아웃은 어떤 단계에서 발생하든 `DeadlineExceeded` 입니다.
pub(crate) fn transport_error(
    error: reqwest::Error,
    stage: fn(String) -> OpenIdError,
    what: &str,
) -> OpenIdError {
    if error.is_timeout() {
        OpenIdError::DeadlineExceeded
    } else {
        stage(format!("{} 요청 실패: {}", what, error))
    }
}
