use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const SCHEMA_RESOURCE: &str = "books.proto";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub schema_url: String,
}

impl ClientConfig {
    /// Reads `CATALOG_API_URL` and `CATALOG_SCHEMA_URL`, falling back to the
    /// local development server and the schema file it serves.
    pub fn from_env() -> Self {
        let base_url = env::var("CATALOG_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let schema_url = env::var("CATALOG_SCHEMA_URL")
            .unwrap_or_else(|_| default_schema_url(&base_url));
        Self {
            base_url,
            schema_url,
        }
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let schema_url = default_schema_url(&base_url);
        Self {
            base_url,
            schema_url,
        }
    }
}

fn default_schema_url(base_url: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), SCHEMA_RESOURCE)
}
