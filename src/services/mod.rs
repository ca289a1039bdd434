// src/services/mod.rs
pub mod cache;
pub mod classifier;
pub mod dashboard;
pub mod dates;
pub mod export;
pub mod macro_data;
pub mod news;
pub mod ratios;
pub mod refresh;
pub mod rss;
pub mod scoring;
