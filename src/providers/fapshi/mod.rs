// Файл: mod.rs
// Корневой файл провайдера Fapshi: модели, валидация и запросы.

pub mod models;
pub mod requests;
pub mod validation;
