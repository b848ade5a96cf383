// Файл: core/error.rs
// Унифицированные типы ошибок: внутренний CoreError и граничный ErrorResult.

use reqwest::StatusCode;
use thiserror::Error;

/// Сообщение по умолчанию, когда шлюз не вернул поле `message`.
pub const FALLBACK_MESSAGE: &str = "Erreur inconnue";

// --- 1. Ошибки валидации ---
// Сообщения совпадают с теми, что ожидают клиенты шлюза.

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount required")]
    AmountRequired,

    #[error("amount must be of type integer")]
    AmountNotInteger,

    #[error("amount cannot be less than 100 XAF")]
    AmountTooLow,

    #[error("phone number required")]
    PhoneRequired,

    #[error("phone must be of type string")]
    PhoneNotString,

    #[error("invalid phone number")]
    InvalidPhone,

    #[error("invalid type, string expected")]
    StringExpected,

    #[error("invalid transaction id")]
    InvalidTransactionId,

    #[error("invalid user id")]
    InvalidUserId,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

// --- 2. Внутренняя ошибка (CoreError) ---

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gateway responded with {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Failed to parse URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Failed to parse JSON response or payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid headers: {0}")]
    InvalidHeader(String),

    #[error("Mention your user name and api key")]
    MissingCredentials,
}

// --- 3. Граничная ошибка (ErrorResult) ---

/// Нормализованная ошибка, которую возвращает каждая операция клиента.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({status_code})")]
pub struct ErrorResult {
    pub message: String,
    pub status_code: u16,
}

impl ErrorResult {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    fn fallback(status_code: u16) -> Self {
        Self::new(FALLBACK_MESSAGE, status_code)
    }
}

impl From<ValidationError> for ErrorResult {
    fn from(err: ValidationError) -> Self {
        ErrorResult::new(err.to_string(), StatusCode::BAD_REQUEST.as_u16())
    }
}

// --- 4. Мост (CoreError -> ErrorResult) ---

impl From<CoreError> for ErrorResult {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),

            // Статус берётся из ответа, если он был; иначе 500.
            CoreError::Network(e) => {
                let status = e
                    .status()
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                    .as_u16();
                ErrorResult::fallback(status)
            }
            CoreError::Status { status, message } => match message {
                Some(m) => ErrorResult::new(m, status.as_u16()),
                None => ErrorResult::fallback(status.as_u16()),
            },

            CoreError::Parse(_) => ErrorResult::fallback(500),

            e @ (CoreError::UrlParse(_)
            | CoreError::InvalidHeader(_)
            | CoreError::MissingCredentials) => ErrorResult::new(e.to_string(), 500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err: ErrorResult = CoreError::from(ValidationError::AmountTooLow).into();
        assert_eq!(err, ErrorResult::new("amount cannot be less than 100 XAF", 400));
    }

    #[test]
    fn status_keeps_remote_message() {
        let err: ErrorResult = CoreError::Status {
            status: StatusCode::NOT_FOUND,
            message: Some("not found".to_string()),
        }
        .into();
        assert_eq!(err, ErrorResult::new("not found", 404));
    }

    #[test]
    fn status_without_message_uses_fallback() {
        let err: ErrorResult = CoreError::Status {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        }
        .into();
        assert_eq!(err, ErrorResult::new(FALLBACK_MESSAGE, 502));
    }

    #[test]
    fn decode_failure_is_internal() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ErrorResult = CoreError::from(parse).into();
        assert_eq!(err.status_code, 500);
        assert_eq!(err.message, FALLBACK_MESSAGE);
    }
}
