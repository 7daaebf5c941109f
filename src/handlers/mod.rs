//! HTTP 요청 핸들러 모듈

pub mod login;
