pub mod advice;
pub mod api;
pub mod config;
pub mod core;
pub mod export;
pub mod render;
