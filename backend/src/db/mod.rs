pub mod connection;
pub mod migrations;
pub mod requests;
pub mod reviews;
pub mod sessions;
pub mod skills;
pub mod users;

pub use connection::{DatabaseConfig, get_db_pool};

/// In-memory database with the full schema, for tests.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    use std::str::FromStr;

    let options = sqlx::sqlite::SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("sqlite options")
        .foreign_keys(true);
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory sqlite");
    migrations::run_migrations(&pool).await.expect("migrations");
    pool
}
