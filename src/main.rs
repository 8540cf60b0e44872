use wow_auctions::utils::logger;
use wow_auctions::{pull_auctions_and_update_db, AppConfig};

#[tokio::main]
async fn main() {
    // .env is optional; real environment variables win
    let _ = dotenv::dotenv();

    logger::init_cli_logger();
    tracing::info!("Starting wow-auctions pull");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!("Config: {:?}", config);

    match pull_auctions_and_update_db(&config).await {
        Ok(summary) => {
            tracing::info!(
                "✅ Pull {} saved: {} new auctions ({} fetched)",
                summary.pull_id,
                summary.auctions_inserted,
                summary.auctions_fetched
            );
            tracing::info!("📁 Database: {}", config.db_path.display());
        }
        Err(e) => {
            tracing::error!("❌ Pull failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}
