use serde::Deserialize;

/// 프로바이더 콜백 쿼리 파라미터
///
/// 사용자가 동의를 거부하면 프로바이더는 `code` 없이 `error` 만 보냅니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthCallbackQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
    pub error: Option<String>,
    pub error_description: Option<String>,
}
