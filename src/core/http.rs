// Файл: core/http.rs
// Фабрика HTTP-клиента и общие константы транспорта.

use super::error::CoreError;
use reqwest::{header, Client};
use std::time::Duration;

pub const APP_USER_AGENT: &str = concat!("fapshi-rs/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SEC: u64 = 30;

/// Собирает `reqwest::Client` с общими заголовками и таймаутом.
///
/// `extra_headers` добавляются поверх общих и отправляются с каждым запросом.
/// Клиент использует Arc внутри, его дешево клонировать между задачами.
pub fn create_http_client(
    extra_headers: Option<header::HeaderMap>,
    timeout: Duration,
) -> Result<Client, CoreError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(APP_USER_AGENT),
    );
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    if let Some(extra) = extra_headers {
        headers.extend(extra);
    }

    let client = Client::builder()
        .default_headers(headers)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()?;
    Ok(client)
}

/// Проверяет пару имя/значение заголовка и кладет её в карту.
pub fn insert_header(
    headers: &mut header::HeaderMap,
    name: &'static str,
    value: &str,
) -> Result<(), CoreError> {
    let value = header::HeaderValue::from_str(value)
        .map_err(|e| CoreError::InvalidHeader(format!("Invalid header value for {}: {}", name, e)))?;
    headers.insert(header::HeaderName::from_static(name), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_extra_headers() {
        let mut headers = header::HeaderMap::new();
        insert_header(&mut headers, "apiuser", "user").unwrap();
        let client = create_http_client(Some(headers), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn rejects_header_value_with_newline() {
        let mut headers = header::HeaderMap::new();
        let result = insert_header(&mut headers, "apikey", "bad\nvalue");
        match result {
            Err(CoreError::InvalidHeader(s)) => assert!(s.contains("apikey")),
            other => panic!("Wrong result: {:?}", other),
        }
    }
}
