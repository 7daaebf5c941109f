//! 보안 랜덤 토큰 생성기
//!
//! OAuth `state` 값처럼 CSRF/리플레이 방지에 사용되는 불투명 문자열을 생성합니다.
//! OS 난수 소스(`OsRng`)에서 바이트를 채우고 URL-safe base64 로 인코딩합니다.
//!
//! 난수 소스가 실패하면 `RandomSourceExhausted` 를 그대로 반환하며,
//! 더 약한 난수 소스로 대체하지 않습니다.

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose},
};
use rsa::rand_core::{OsRng, RngCore};

use crate::core::errors::{OpenIdError, OpenIdResult};

/// 패딩 유무와 관계없이 URL-safe base64 를 디코딩하는 엔진
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// `length` 바이트의 보안 난수를 URL-safe base64 문자열로 반환합니다.
///
/// # 인자
///
/// * `length` - 난수 바이트 수 (1 이상)
///
/// # Errors
///
/// * `OpenIdError::InvalidTokenLength` - `length` 가 0인 경우
/// * `OpenIdError::RandomSourceExhausted` - OS 난수 소스 실패
///
/// # 예제
///
/// ```rust,ignore
/// let state = generate_token(32)?;
/// let login_url = client.generate_login_url(&state);
/// ```
pub fn generate_token(length: usize) -> OpenIdResult<String> {
    if length == 0 {
        return Err(OpenIdError::InvalidTokenLength(length));
    }

    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| OpenIdError::RandomSourceExhausted(e.to_string()))?;

    Ok(general_purpose::URL_SAFE.encode(&bytes))
}

/// `generate_token` 으로 만든 문자열을 원래 바이트로 되돌립니다.
pub fn decode_token(token: &str) -> Option<Vec<u8>> {
    URL_SAFE_LENIENT.decode(token).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_decodes_to_requested_length() {
        for length in [1usize, 2, 3, 16, 31, 32, 64, 100] {
            let token = generate_token(length).unwrap();
            let decoded = decode_token(&token).unwrap();
            assert_eq!(decoded.len(), length, "length {} 토큰 디코딩 실패", length);
        }
    }

    #[test]
    fn test_token_is_url_safe() {
        let token = generate_token(48).unwrap();
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '=')
        );
    }

    #[test]
    fn test_unpadded_token_still_decodes() {
        let token = generate_token(31).unwrap();
        let trimmed = token.trim_end_matches('=');

        assert_eq!(decode_token(trimmed).unwrap().len(), 31);
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            generate_token(0),
            Err(OpenIdError::InvalidTokenLength(0))
        ));
    }

    #[test]
    fn test_no_collisions_in_ten_thousand_trials() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let token = generate_token(16).unwrap();
            assert!(seen.insert(token), "중복 토큰 발생");
        }
    }
}
