use swapskillz::{Config, app, db, utils};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;
    let db_config = db::DatabaseConfig::from_env()?;
    let pool = db::get_db_pool(&db_config).await?;

    // Run migrations
    db::migrations::run_migrations(&pool).await?;

    let port = config.port;
    let router = app::create_router(pool);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
