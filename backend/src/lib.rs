pub mod app;
pub mod auth;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod utils;

pub use db::connection::get_db_pool;
pub use utils::config::Config;

// Re-export common types
pub use anyhow::Result;
pub use chrono::{DateTime, Utc};
pub use sqlx::SqlitePool;
pub use uuid::Uuid;
