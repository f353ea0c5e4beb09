// src/config/mod.rs
pub mod categories;
pub mod news;
