//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Number of contacts returned per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}
