//! # userinfo 프로필 클레임
//!
//! 프로바이더의 userinfo 엔드포인트가 반환하는 표준 프로필 클레임입니다.
//! 모든 필드는 선택 사항이며, 응답에 없는 필드는 `None` 으로 남습니다.
//!
//! ## 필드 매핑
//!
//! | 클레임 | 필드 |
//! |--------|------|
//! | `sub` | `sub` |
//! | `email` | `email` |
//! | `given_name` | `given_name` |
//! | `family_name` | `family_name` |
//! | `nickname` | `nickname` |
//! | `picture` | `picture_url` |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub given_name: Option<String>,

    #[serde(default)]
    pub family_name: Option<String>,

    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(default, rename = "picture")]
    pub picture_url: Option<String>,
}
