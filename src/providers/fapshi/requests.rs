// Файл: requests.rs
// Клиент шлюза Fapshi: конфигурация и восемь операций API.

use super::models::{
    Balance, MobilePaymentRequest, PaymentAccepted, PaymentLink, PaymentRequest, Response,
    SearchFilter, Transaction, TransactionList,
};
use super::validation::{TransactionId, UserId};
use crate::core::error::{CoreError, ErrorResult, ValidationError};
use crate::core::http::{create_http_client, insert_header, DEFAULT_TIMEOUT_SEC};
use crate::core::json::{decode_or_default, error_message, raw_body};
use log::{debug, warn};
use reqwest::{header::HeaderMap, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use url::Url;

pub const LIVE_BASE_URL: &str = "https://live.fapshi.com";
pub const SANDBOX_BASE_URL: &str = "https://sandbox.fapshi.com";

const API_USER_HEADER: &str = "apiuser";
const API_KEY_HEADER: &str = "apikey";

/// Результат операции: ответ со статусом или нормализованная ошибка.
pub type GatewayResult<T> = Result<Response<T>, ErrorResult>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Live,
    Sandbox,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Live => LIVE_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

// --- Конфигурация ---

#[derive(Debug, Clone)]
pub struct FapshiClientBuilder {
    api_user: String,
    api_key: String,
    environment: Environment,
    base_url: Option<String>,
    timeout: Duration,
}

impl FapshiClientBuilder {
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Перекрывает адрес, выбранный через `environment`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<FapshiClient, CoreError> {
        if self.api_user.is_empty() || self.api_key.is_empty() {
            return Err(CoreError::MissingCredentials);
        }

        let raw_base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url());
        let base_url = Url::parse(raw_base)?;

        let mut headers = HeaderMap::new();
        insert_header(&mut headers, API_USER_HEADER, &self.api_user)?;
        insert_header(&mut headers, API_KEY_HEADER, &self.api_key)?;
        let client = create_http_client(Some(headers), self.timeout)?;

        Ok(FapshiClient {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }
}

// --- Клиент ---

/// Клиент шлюза. Учетные данные зашиты в заголовки `reqwest::Client`
/// и не меняются после создания; клон дешевый и разделяет пул соединений.
#[derive(Debug, Clone)]
pub struct FapshiClient {
    client: Client,
    base_url: String,
}

impl FapshiClient {
    /// Клиент для боевого окружения с настройками по умолчанию.
    pub fn new(api_user: impl Into<String>, api_key: impl Into<String>) -> Result<Self, CoreError> {
        Self::builder(api_user, api_key).build()
    }

    pub fn builder(api_user: impl Into<String>, api_key: impl Into<String>) -> FapshiClientBuilder {
        FapshiClientBuilder {
            api_user: api_user.into(),
            api_key: api_key.into(),
            environment: Environment::default(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SEC),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Создает ссылку на оплату, куда нужно перенаправить плательщика.
    pub async fn initiate_pay(&self, request: &PaymentRequest) -> GatewayResult<PaymentLink> {
        let body = request.validate().map_err(rejected)?;
        let builder = self.client.post(self.url("/initiate-pay")).json(&body);
        self.execute(builder, "POST /initiate-pay").await
    }

    /// Отправляет запрос оплаты прямо на телефон плательщика.
    pub async fn direct_pay(&self, request: &MobilePaymentRequest) -> GatewayResult<PaymentAccepted> {
        let body = request.validate().map_err(rejected)?;
        let builder = self.client.post(self.url("/direct-pay")).json(&body);
        self.execute(builder, "POST /direct-pay").await
    }

    pub async fn payment_status(&self, trans_id: &str) -> GatewayResult<Transaction> {
        let trans_id = TransactionId::parse(trans_id).map_err(rejected)?;
        let path = format!("/payment-status/{}", trans_id);
        let builder = self.client.get(self.url(&path));
        self.execute(builder, "GET /payment-status").await
    }

    /// Досрочно закрывает транзакцию; возвращает её итоговое состояние.
    pub async fn expire_pay(&self, trans_id: &str) -> GatewayResult<Transaction> {
        let trans_id = TransactionId::parse(trans_id).map_err(rejected)?;
        let builder = self
            .client
            .post(self.url("/expire-pay"))
            .json(&json!({ "transId": trans_id }));
        self.execute(builder, "POST /expire-pay").await
    }

    /// Все транзакции, привязанные к `userId`. Статус не прикладывается.
    pub async fn user_trans(&self, user_id: &str) -> Result<TransactionList, ErrorResult> {
        let user_id = UserId::parse(user_id).map_err(rejected)?;
        let path = format!("/transaction/{}", user_id);
        let builder = self.client.get(self.url(&path));
        let response = self.execute::<Vec<Transaction>>(builder, "GET /transaction").await?;
        Ok(TransactionList {
            items: response.payload,
            raw: response.raw,
        })
    }

    pub async fn balance(&self) -> GatewayResult<Balance> {
        let builder = self.client.get(self.url("/balance"));
        self.execute(builder, "GET /balance").await
    }

    /// Выплата на телефон. В боевом окружении выплаты должны быть включены.
    pub async fn payout(&self, request: &MobilePaymentRequest) -> GatewayResult<PaymentAccepted> {
        let body = request.validate().map_err(rejected)?;
        let builder = self.client.post(self.url("/payout")).json(&body);
        self.execute(builder, "POST /payout").await
    }

    pub async fn search(&self, filter: &SearchFilter) -> Result<TransactionList, ErrorResult> {
        let builder = self.client.get(self.url("/search")).query(filter);
        let response = self.execute::<Vec<Transaction>>(builder, "GET /search").await?;
        Ok(TransactionList {
            items: response.payload,
            raw: response.raw,
        })
    }

    // --- Внутренняя логика ---

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned + Default>(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> GatewayResult<T> {
        self.send(builder, context).await.map_err(|e| {
            warn!("Fapshi request {} failed: {}", context, e);
            ErrorResult::from(e)
        })
    }

    async fn send<T: DeserializeOwned + Default>(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> Result<Response<T>, CoreError> {
        debug!("Executing Fapshi request {}", context);

        let response = builder.send().await?;
        // Статус уже известен: сбой чтения тела его не отменяет.
        let status = response.status();
        let body = response.text().await.unwrap_or_else(|e| {
            warn!("Fapshi response body for {} unreadable ({}): {}", context, status, e);
            String::new()
        });

        if !status.is_success() {
            return Err(CoreError::Status {
                status,
                message: error_message(&body),
            });
        }

        let raw = raw_body(&body, context);
        let payload = decode_or_default::<T>(&raw, context);
        Ok(Response {
            payload,
            raw,
            status_code: status.as_u16(),
        })
    }
}

fn rejected(err: ValidationError) -> ErrorResult {
    warn!("Fapshi request rejected locally: {}", err);
    err.into()
}
