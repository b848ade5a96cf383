//! Клиент платежного шлюза Fapshi.
//!
//! Каждая операция проверяет вход локально, делает один HTTP-запрос и
//! возвращает `Result` с ответом или нормализованной [`ErrorResult`].

pub mod core;
pub mod providers;

pub use crate::core::error::{CoreError, ErrorResult, ValidationError};
pub use providers::fapshi::models::{
    Balance, Medium, MobilePaymentRequest, PaymentAccepted, PaymentLink, PaymentRequest, Response,
    SearchFilter, SearchStatus, SortOrder, Transaction, TransactionList, TransactionStatus,
};
pub use providers::fapshi::requests::{Environment, FapshiClient, FapshiClientBuilder, GatewayResult};
pub use providers::fapshi::validation::{Amount, Phone, TransactionId, UserId};

/// Подключает `env_logger`; повторный вызов ничего не делает.
pub fn init_logger() {
    let _ = env_logger::try_init();
}
