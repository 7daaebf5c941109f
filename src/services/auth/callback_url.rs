//! OAuth 콜백 URL 빌더

/// 프로바이더별 콜백(리디렉션) URL 을 만듭니다.
///
/// 프로바이더 콘솔에 등록된 값과 정확히 일치해야 하므로 형식은 고정이며,
/// `host` 형식은 검증하지 않고 그대로 사용합니다.
///
/// ```rust,ignore
/// assert_eq!(
///     callback_url("https://example.com", "google"),
///     "https://example.com/api/v1/login/google/callback"
/// );
/// ```
pub fn callback_url(host: &str, provider_id: &str) -> String {
    format!("{}/api/v1/login/{}/callback", host, provider_id)
}
