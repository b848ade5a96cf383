// Файл: models.rs
// Модели запросов и ответов шлюза Fapshi (serde, camelCase на проводе).

use super::validation::{Amount, Phone};
use crate::core::error::ValidationError;
use crate::core::json::lenient;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// --- Результат операции ---

/// Успешный ответ шлюза вместе с HTTP-статусом.
///
/// `payload` - типизированный вид ответа, `raw` - тело ровно в том виде,
/// в каком его прислал шлюз (поля, не попавшие в модель, остаются здесь).
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub payload: T,
    pub raw: Value,
    pub status_code: u16,
}

// --- Перечисления ---

/// Канал оплаты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Medium {
    #[serde(rename = "mobile money")]
    MobileMoney,
    #[serde(rename = "orange money")]
    OrangeMoney,
}

/// Статус транзакции в ответах шлюза.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[serde(alias = "CREATED")]
    Created,
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "SUCCESSFUL")]
    Successful,
    #[serde(alias = "FAILED")]
    Failed,
    #[serde(alias = "EXPIRED")]
    Expired,
    #[serde(other)]
    Unknown,
}

/// Статусы, по которым `GET /search` умеет фильтровать.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Created,
    Successful,
    Failed,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

// --- Запросы ---

/// Запрос `POST /initiate-pay`. Обязательна только сумма.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: i64) -> Self {
        Self {
            amount,
            ..Default::default()
        }
    }

    /// Тело запроса строится только из проверенных значений.
    pub(crate) fn validate(&self) -> Result<PaymentBody<'_>, ValidationError> {
        Ok(PaymentBody {
            amount: Amount::new(self.amount)?,
            email: self.email.as_deref(),
            redirect_url: self.redirect_url.as_deref(),
            user_id: self.user_id.as_deref(),
            external_id: self.external_id.as_deref(),
            message: self.message.as_deref(),
        })
    }
}

/// Запрос `POST /direct-pay` и `POST /payout`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobilePaymentRequest {
    pub amount: i64,
    pub phone: String,
    #[serde(default)]
    pub medium: Option<Medium>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MobilePaymentRequest {
    pub fn new(amount: i64, phone: impl Into<String>) -> Self {
        Self {
            amount,
            phone: phone.into(),
            ..Default::default()
        }
    }

    /// Сначала сумма, потом телефон.
    pub(crate) fn validate(&self) -> Result<MobilePaymentBody<'_>, ValidationError> {
        let amount = Amount::new(self.amount)?;
        let phone = Phone::parse(&self.phone)?;
        Ok(MobilePaymentBody {
            amount,
            phone,
            medium: self.medium,
            name: self.name.as_deref(),
            email: self.email.as_deref(),
            user_id: self.user_id.as_deref(),
            external_id: self.external_id.as_deref(),
            message: self.message.as_deref(),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentBody<'a> {
    amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MobilePaymentBody<'a> {
    amount: Amount,
    phone: Phone,
    #[serde(skip_serializing_if = "Option::is_none")]
    medium: Option<Medium>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

// Динамический вход: проверки в том же порядке, что и для JSON-клиентов шлюза.

impl TryFrom<Value> for PaymentRequest {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut map) = value else {
            return Err(ValidationError::AmountRequired);
        };
        let amount = Amount::try_from(map.get("amount").unwrap_or(&Value::Null))?;
        map.insert("amount".to_string(), Value::from(amount.get()));
        serde_json::from_value(Value::Object(map))
            .map_err(|e| ValidationError::InvalidPayload(e.to_string()))
    }
}

impl TryFrom<Value> for MobilePaymentRequest {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut map) = value else {
            return Err(ValidationError::AmountRequired);
        };
        let amount = Amount::try_from(map.get("amount").unwrap_or(&Value::Null))?;
        Phone::try_from(map.get("phone").unwrap_or(&Value::Null))?;
        map.insert("amount".to_string(), Value::from(amount.get()));
        serde_json::from_value(Value::Object(map))
            .map_err(|e| ValidationError::InvalidPayload(e.to_string()))
    }
}

/// Параметры `GET /search`. Отправляются как query-строка, без локальной проверки.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SearchStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<Medium>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Минимальная сумма.
    #[serde(rename = "amt", skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<u64>,
    /// 1..=100, на стороне шлюза по умолчанию 10.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl SearchFilter {
    pub fn status(mut self, status: SearchStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn medium(mut self, medium: Medium) -> Self {
        self.medium = Some(medium);
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn min_amount(mut self, amount: u64) -> Self {
        self.min_amount = Some(amount);
        self
    }

    pub fn limit(mut self, limit: u8) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }
}

// --- Ответы ---
// Все поля необязательные и терпимые к типу: успешный ответ шлюза
// никогда не превращается в ошибку из-за формы тела.

/// Ответ `initiate-pay`: ссылка, по которой плательщик завершает оплату.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub trans_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date_initiated: Option<DateTime<Utc>>,
}

/// Ответ `direct-pay` и `payout`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAccepted {
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub trans_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date_initiated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, deserialize_with = "lenient")]
    pub trans_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<TransactionStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub medium: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub service_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub payer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub redirect_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub external_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub webhook: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub financial_trans_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date_initiated: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub date_confirmed: Option<DateTime<Utc>>,
}

/// Ответ `GET /transaction/{userId}` и `GET /search`: список без статуса.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionList {
    pub items: Vec<Transaction>,
    pub raw: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Balance {
    #[serde(default, deserialize_with = "lenient")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub balance: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency: Option<String>,
}

// RFC 3339, дата-время без зоны (считается UTC) или просто дата (полночь UTC).
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = lenient(deserializer)?;
    let Some(text) = text else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(naive.and_utc()));
    }
    Ok(NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_body_skips_empty_fields() {
        let mut req = PaymentRequest::new(500);
        req.external_id = Some("order-1".to_string());
        let body = req.validate().unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"amount": 500, "externalId": "order-1"})
        );
    }

    #[test]
    fn mobile_body_carries_validated_values() {
        let mut req = MobilePaymentRequest::new(100, "612345678");
        req.medium = Some(Medium::OrangeMoney);
        let body = req.validate().unwrap();
        assert_eq!(body.amount.get(), 100);
        assert_eq!(body.phone.as_str(), "612345678");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"amount": 100, "phone": "612345678", "medium": "orange money"})
        );
    }

    #[test]
    fn validation_stops_before_a_body_exists() {
        assert!(matches!(
            PaymentRequest::new(99).validate(),
            Err(ValidationError::AmountTooLow)
        ));
        assert!(matches!(
            MobilePaymentRequest::new(100, "512345678").validate(),
            Err(ValidationError::InvalidPhone)
        ));
    }

    #[test]
    fn payment_request_from_json() {
        let req = PaymentRequest::try_from(json!({"amount": 1000.0, "userId": "u-1"})).unwrap();
        assert_eq!(req.amount, 1000);
        assert_eq!(req.user_id.as_deref(), Some("u-1"));

        assert_eq!(
            PaymentRequest::try_from(json!({"email": "a@b.c"})),
            Err(ValidationError::AmountRequired)
        );
        assert_eq!(
            PaymentRequest::try_from(json!({"amount": "1000"})),
            Err(ValidationError::AmountNotInteger)
        );
        assert!(matches!(
            PaymentRequest::try_from(json!({"amount": 1000, "email": 5})),
            Err(ValidationError::InvalidPayload(_))
        ));
    }

    #[test]
    fn mobile_request_from_json_checks_amount_before_phone() {
        assert_eq!(
            MobilePaymentRequest::try_from(json!({"amount": 10, "phone": 5})),
            Err(ValidationError::AmountTooLow)
        );
        assert_eq!(
            MobilePaymentRequest::try_from(json!({"amount": 100})),
            Err(ValidationError::PhoneRequired)
        );
        assert_eq!(
            MobilePaymentRequest::try_from(json!({"amount": 100, "phone": 612345678})),
            Err(ValidationError::PhoneNotString)
        );
        assert_eq!(
            MobilePaymentRequest::try_from(json!({"amount": 100, "phone": "712345678"})),
            Err(ValidationError::InvalidPhone)
        );
        let ok = MobilePaymentRequest::try_from(json!({"amount": 100, "phone": "612345678"})).unwrap();
        assert_eq!(ok, MobilePaymentRequest::new(100, "612345678"));
    }

    #[test]
    fn search_status_has_no_pending() {
        let filter = SearchFilter::default().status(SearchStatus::Expired);
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({"status": "expired"}));
    }

    #[test]
    fn transaction_accepts_gateway_spelling() {
        let tx: Transaction = serde_json::from_value(json!({
            "transId": "AbC12345",
            "status": "SUCCESSFUL",
            "medium": "mobile money",
            "amount": 500,
            "dateInitiated": "2024-03-01T10:00:00.000Z",
            "dateConfirmed": null
        }))
        .unwrap();
        assert_eq!(tx.status, Some(TransactionStatus::Successful));
        assert_eq!(tx.amount, Some(500));
        assert!(tx.date_initiated.is_some());
        assert!(tx.date_confirmed.is_none());
    }

    #[test]
    fn transaction_tolerates_unfamiliar_values() {
        let tx: Transaction = serde_json::from_value(json!({
            "transId": "AbC12345",
            "status": "REVERSED",
            "amount": "500",
            "dateInitiated": "2024-03-01",
            "dateConfirmed": "yesterday"
        }))
        .unwrap();
        assert_eq!(tx.trans_id.as_deref(), Some("AbC12345"));
        assert_eq!(tx.status, Some(TransactionStatus::Unknown));
        assert_eq!(tx.amount, None);
        assert_eq!(
            tx.date_initiated,
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|n| n.and_utc())
        );
        assert_eq!(tx.date_confirmed, None);
    }

    #[test]
    fn balance_without_amount_still_decodes() {
        let balance: Balance = serde_json::from_value(json!({"service": "Shop"})).unwrap();
        assert_eq!(balance.balance, None);
        assert_eq!(balance.service.as_deref(), Some("Shop"));
    }
}
