use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Card images are served from `{card_image_base_url}/{card_id}.png`.
    pub card_image_base_url: String,
    pub card_names_path: String,
    pub card_names_ttl_secs: i64,
    pub image_fetch_timeout_ms: u64,
    pub collage_background_path: Option<String>,
    /// Mirroring is disabled when unset.
    pub mirror_api_base: Option<String>,
    pub mirror_page_base: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mirror_api_base = optional_env("MIRROR_API_BASE");
        let mirror_page_base =
            optional_env("MIRROR_PAGE_BASE").or_else(|| mirror_api_base.clone());

        Ok(Config {
            port: parse_env("PORT", "8080")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            card_image_base_url: require_env("CARD_IMAGE_BASE_URL")?,
            card_names_path: std::env::var("CARD_NAMES_PATH")
                .unwrap_or_else(|_| "data/card_names.json".to_string()),
            card_names_ttl_secs: parse_env("CARD_NAMES_TTL_SECS", "3600")?,
            image_fetch_timeout_ms: parse_env("IMAGE_FETCH_TIMEOUT_MS", "5000")?,
            collage_background_path: optional_env("COLLAGE_BACKGROUND_PATH"),
            mirror_api_base,
            mirror_page_base,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .with_context(|| format!("{key} is not a valid value"))
}
