use serde::Deserialize;

use crate::models::DEFAULT_RESPONSE_BODY;

fn default_store_url() -> String {
    "http://localhost:8344".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_response_body() -> String {
    DEFAULT_RESPONSE_BODY.to_string()
}

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the definition store backend.
    #[serde(default = "default_store_url")]
    pub store_url: String,
    /// Rows per page when the console starts.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Canned response body given to newly created definitions.
    #[serde(default = "default_response_body")]
    pub default_response_body: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_url: default_store_url(),
            page_size: default_page_size(),
            default_response_body: default_response_body(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}
