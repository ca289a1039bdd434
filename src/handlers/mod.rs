// src/handlers/mod.rs
pub mod error;
pub mod listed;
pub mod macro_series;
pub mod news;
pub mod status;
