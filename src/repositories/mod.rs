//! 데이터 접근 계층

pub mod accounts;

pub use accounts::*;
