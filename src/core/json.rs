// Файл: core/json.rs
// Унифицированные хелперы для JSON-ответов шлюза.

use super::error::CoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Тело ошибки шлюза. Интересует только поле `message`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Унифицированная функция парсинга JSON.
/// `context` используется только для логирования (например, "GET /balance").
pub fn parse_json_from_text<T: DeserializeOwned>(
    response_text: &str,
    context: &str,
) -> Result<T, CoreError> {
    serde_json::from_str(response_text).map_err(|e| {
        log::warn!("Failed to parse JSON for {}: {}", context, e);
        CoreError::from(e)
    })
}

/// Сырое тело успешного ответа. Пустое тело дает `Null`, не-JSON остается строкой.
pub fn raw_body(response_text: &str, context: &str) -> Value {
    if response_text.trim().is_empty() {
        return Value::Null;
    }
    parse_json_from_text::<Value>(response_text, context)
        .unwrap_or_else(|_| Value::String(response_text.to_string()))
}

/// Типизированный вид сырого ответа; при несовпадении формы `T::default()`.
/// Сам ответ при этом не теряется: он остается в `raw`.
pub fn decode_or_default<T: DeserializeOwned + Default>(raw: &Value, context: &str) -> T {
    T::deserialize(raw).unwrap_or_else(|e| {
        log::warn!("Unexpected payload shape for {}: {}", context, e);
        T::default()
    })
}

/// `deserialize_with` для необязательных полей: значение неожиданного типа
/// превращается в `None` вместо ошибки всего ответа.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Достает `message` из тела ошибки; `None`, если тела нет или это не JSON.
pub fn error_message(response_text: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(response_text)
        .ok()
        .and_then(|body| body.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Wallet {
        #[serde(default, deserialize_with = "lenient")]
        balance: Option<i64>,
        #[serde(default, deserialize_with = "lenient")]
        currency: Option<String>,
    }

    #[test]
    fn raw_body_keeps_whatever_the_gateway_sent() {
        let raw = raw_body(r#"{"service":"Shop","balance":2500}"#, "GET /balance");
        assert_eq!(raw, json!({"service": "Shop", "balance": 2500}));
        assert_eq!(raw_body("OK", "GET /balance"), Value::String("OK".to_string()));
        assert_eq!(raw_body("  ", "GET /balance"), Value::Null);
    }

    #[test]
    fn lenient_fields_drop_only_the_odd_value() {
        let raw = json!({"balance": "2500", "currency": "XAF"});
        let wallet: Wallet = decode_or_default(&raw, "GET /balance");
        assert_eq!(wallet, Wallet { balance: None, currency: Some("XAF".to_string()) });
    }

    #[test]
    fn non_object_payload_decodes_to_default() {
        let wallet: Wallet = decode_or_default(&json!(["unexpected"]), "GET /balance");
        assert_eq!(wallet, Wallet::default());
    }

    #[test]
    fn truncated_gateway_body_is_a_parse_error() {
        let result = parse_json_from_text::<Value>(r#"{"transId":"AbC1"#, "POST /direct-pay");
        assert!(matches!(result, Err(CoreError::Parse(_))));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(error_message(r#"{"message":"not found"}"#).as_deref(), Some("not found"));
        assert_eq!(error_message(r#"{"error":"x"}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(""), None);
    }
}
