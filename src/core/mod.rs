// src/core/mod.rs

pub mod converter;
pub mod engine;
pub mod table;
pub mod types;
