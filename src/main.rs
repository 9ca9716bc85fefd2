use ledger_buddy::{
    bot,
    config::{database, settings},
    errors::Result,
};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Tracing first so startup failures are logged
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal, env vars can be set externally
    dotenvy::dotenv().ok();
    info!("Attempted to load .env file.");

    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load application configuration: {}", e))?;
    info!(budget = ?app_config.budget, "Loaded application configuration.");

    if database::get_database_url() == database::DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }

    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // DISCORD_BOT_TOKEN is read directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))?;

    bot::run_bot(token, Arc::new(app_config), db).await
}
