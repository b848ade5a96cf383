// Файл: validation.rs
// Проверка входных данных до обращения к сети.

use crate::core::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Display, Formatter};

pub const MIN_AMOUNT: i64 = 100;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^6\d{8}$").expect("Static phone regex failed to compile"));
static TRANS_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{8,10}$").expect("Static transaction id regex failed to compile")
});
static USER_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9\-_]{1,100}$").expect("Static user id regex failed to compile")
});

// --- Amount ---

/// Сумма платежа в XAF, не меньше [`MIN_AMOUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Ноль считается отсутствующей суммой.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::AmountRequired);
        }
        if value < MIN_AMOUNT {
            return Err(ValidationError::AmountTooLow);
        }
        Ok(Amount(value as u64))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Amount {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl TryFrom<f64> for Amount {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 0.0 || value.is_nan() {
            return Err(ValidationError::AmountRequired);
        }
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ValidationError::AmountNotInteger);
        }
        if value < MIN_AMOUNT as f64 {
            return Err(ValidationError::AmountTooLow);
        }
        Ok(Amount(value as u64))
    }
}

impl TryFrom<&Value> for Amount {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        if is_falsy(value) {
            return Err(ValidationError::AmountRequired);
        }
        let Value::Number(n) = value else {
            return Err(ValidationError::AmountNotInteger);
        };
        if let Some(i) = n.as_i64() {
            return Amount::new(i);
        }
        if let Some(u) = n.as_u64() {
            return Ok(Amount(u));
        }
        match n.as_f64() {
            Some(f) => Amount::try_from(f),
            None => Err(ValidationError::AmountNotInteger),
        }
    }
}

// --- Phone ---

/// Номер мобильного кошелька: 9 цифр, начинается с 6.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::PhoneRequired);
        }
        if !PHONE_RE.is_match(value) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(Phone(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&Value> for Phone {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        if is_falsy(value) {
            return Err(ValidationError::PhoneRequired);
        }
        match value {
            Value::String(s) => Phone::parse(s),
            _ => Err(ValidationError::PhoneNotString),
        }
    }
}

// --- TransactionId ---

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::StringExpected);
        }
        if !TRANS_ID_RE.is_match(value) {
            return Err(ValidationError::InvalidTransactionId);
        }
        Ok(TransactionId(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// --- UserId ---

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::StringExpected);
        }
        if !USER_ID_RE.is_match(value) {
            return Err(ValidationError::InvalidUserId);
        }
        Ok(UserId(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Ложные значения в смысле JSON-клиентов шлюза: null, false, 0, "".
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
