// Файл: core/mod.rs
// Общие утилиты: ошибки, HTTP-фабрика, JSON.

pub mod error;
pub mod http;
pub mod json;

pub use error::{CoreError, ErrorResult, ValidationError, FALLBACK_MESSAGE};
