//! Seed command - loads books into the catalog from a JSON file
//!
//! Book creation has no HTTP endpoint; this is the out-of-band path. Run it
//! against the postgres backend to populate a persistent catalog.

use std::path::PathBuf;

use clap::Args;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::infrastructure::book::NewBook;
use crate::infrastructure::logging;

/// Arguments for the seed command
#[derive(Args)]
pub struct SeedArgs {
    /// Path to a JSON file containing an array of books
    #[arg(long, default_value = "seeds/books.json")]
    pub file: PathBuf,
}

/// A book entry in the seed file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedBook {
    title: String,
    author: String,
    genre: String,
    summary: Option<String>,
    author_bio: Option<String>,
}

/// Load books from the seed file into the configured store
pub async fn run(args: SeedArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });

    if config.storage.backend == "memory" {
        warn!("Seeding the in-memory backend; the data is gone when this process exits");
    }

    let state = crate::create_app_state_with_config(&config).await?;

    let raw = std::fs::read_to_string(&args.file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.file.display(), e))?;
    let books: Vec<SeedBook> = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", args.file.display(), e))?;

    let total = books.len();

    for book in books {
        let created = state
            .catalog_service
            .add_book(NewBook {
                title: book.title,
                author: book.author,
                genre: book.genre,
                summary: book.summary,
                author_bio: book.author_bio,
            })
            .await?;

        info!(id = %created.id(), title = %created.title(), "Seeded book");
    }

    info!("Seeded {} books from {}", total, args.file.display());

    Ok(())
}
