/*
 * Responsibility
 * - HTTP の公開ポイント (routes() と permission 定数の re-export)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::{permissions, routes};
