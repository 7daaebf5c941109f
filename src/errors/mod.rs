//! HTTP 계층 에러 타입

pub mod errors;

pub use errors::*;
