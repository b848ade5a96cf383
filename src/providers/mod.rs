// Файл: providers/mod.rs

pub mod fapshi;
