use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*};

pub mod ai;
pub mod calc;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod db;
pub mod flow;
pub mod handlers;
pub mod messages;
pub mod router;
pub mod shopping_list;
pub mod system_info;
pub mod text_utils;

pub use config::Config;
pub use handlers::{schema, Services};
pub use system_info::get_system_info;

use ai::AiGateway;
use catalog::Catalog;
use flow::State;
use shopping_list::ShoppingListStore;

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting StroyHelper bot...");

    let config = Config::from_env();
    let bot = Bot::from_env();

    // --- SQLite Pool ---
    let db_url = db::prepare_sqlite_url(&config.db_url);
    tracing::info!("Connecting to database at: {}", &db_url);
    let db = db::Database::new(db::connect_db(&db_url, 5).await?);
    db.init_schema().await?;
    tracing::info!("Database connection successful.");

    let catalog = Catalog::load(config.catalog_path.as_deref()).await?;
    let lists = ShoppingListStore::new(config.shopping_list_path.clone());
    tracing::info!(path = %lists.path().display(), "Shopping lists file");

    let ai = config.ai.clone().map(AiGateway::new);
    match &ai {
        Some(gateway) => tracing::info!(models = ?gateway.config().models, "AI answers enabled"),
        None => tracing::info!("HF_API_TOKEN not set, AI answers disabled"),
    }

    let services = Services {
        catalog: Arc::new(catalog),
        db,
        lists,
        ai,
    };

    // --- Dispatcher ---
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![services, InMemStorage::<State>::new()])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
