use std::env;
use std::path::PathBuf;

use crate::ai::config::AiConfig;

pub const DEFAULT_DB_URL: &str = "sqlite:stroyhelper.db";
pub const DEFAULT_SHOPPING_LIST_PATH: &str = "shopping_list.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub db_url: String,
    pub shopping_list_path: PathBuf,
    /// Catalog override; the embedded catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let db_url = env::var("DB_URL").unwrap_or_else(|_| DEFAULT_DB_URL.to_string());
        let shopping_list_path = env::var("SHOPPING_LIST_PATH")
            .unwrap_or_else(|_| DEFAULT_SHOPPING_LIST_PATH.to_string())
            .into();
        let catalog_path = env::var("CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let ai = AiConfig::from_env();
        Self {
            db_url,
            shopping_list_path,
            catalog_path,
            ai,
        }
    }
}
