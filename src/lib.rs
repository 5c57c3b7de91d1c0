// src/lib.rs
pub mod api;
pub mod batch;
pub mod models;
pub mod prediction;
pub mod utils;
