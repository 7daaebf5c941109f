//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::auth::{LoginService, RequestContext};
//!
//! let response = login_service.begin_login("google")?;
//! let result = login_service
//!     .complete_login("google", &code, &state, &RequestContext::background())
//!     .await?;
//! ```

pub mod auth;
