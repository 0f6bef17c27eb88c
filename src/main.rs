use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod app;
mod archive;
mod config;
mod error;
mod models;
mod shows;

use app::App;
use archive::ArchiveClient;
use config::Config;
use shows::{Selector, ShowDatabase};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Progress goes to stderr at info level unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::default();
    let selector = Selector::from_config(&config);

    let db = ShowDatabase::load_or_create(&config.db_path, &selector).with_context(|| {
        format!("Failed to load show database at {}", config.db_path.display())
    })?;
    if !db.is_empty() {
        tracing::info!(
            "Loaded {} existing shows, resuming from page {}",
            db.len(),
            db.last_processed_page()
        );
    }

    let client = ArchiveClient::new(&config).context("Failed to create HTTP client")?;
    let app = App::new(config, client);

    let summary = app.run(db).await?;

    println!("Database built with {} unique shows", summary.shows);
    println!(
        "Processed {} pages, last processed page: {}",
        summary.pages_processed, summary.last_page
    );

    Ok(())
}
