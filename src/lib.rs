pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod media;
pub mod models;
pub mod validate;

use tracing_subscriber::EnvFilter;

/// Run the server: initialize logging, prepare the data directory, open the
/// store once to apply migrations, then serve until interrupted.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let db_path = config::database_path();
    db::sqlite::open_database(&db_path)?;

    let media_dir = config::media_dir();
    media::init_media_dir(&media_dir)?;

    let ctx = api::ApiContext::new(db_path, media_dir);
    let mut server = api::start_server(ctx, config::bind_addr()).await?;
    tracing::info!("listening on {}", server.addr);

    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received, shutting down");
    server.shutdown();
    server.join().await;

    Ok(())
}
