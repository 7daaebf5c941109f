//! 데이터 전송 객체

pub mod login;

pub use login::*;
