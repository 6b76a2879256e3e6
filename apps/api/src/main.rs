mod card_names;
mod collage;
mod config;
mod errors;
mod i18n;
mod layout;
mod mirror;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use image::RgbaImage;

use crate::card_names::{CardNameCache, JsonFileSource};
use crate::collage::fetch::ImageFetcher;
use crate::config::Config;
use crate::i18n::bundled_translations;
use crate::layout::default_canvas_config;
use crate::mirror::MirrorClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("collage_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting collage API v{}", env!("CARGO_PKG_VERSION"));

    let canvas = default_canvas_config();
    info!(
        "Collage canvas: {}x{}, {} candidate sizes, floor {}px",
        canvas.width,
        canvas.height,
        canvas.candidate_sizes.len(),
        canvas.min_card_size
    );

    let translations = Arc::new(bundled_translations()?);

    // Card names are loaded lazily on first lookup
    let card_names = Arc::new(CardNameCache::new(
        Arc::new(JsonFileSource::new(&config.card_names_path)),
        chrono::Duration::seconds(config.card_names_ttl_secs),
    ));

    let fetcher = ImageFetcher::new(
        &config.card_image_base_url,
        Duration::from_millis(config.image_fetch_timeout_ms),
    )?;
    info!("Card images served from {}", config.card_image_base_url);

    let background = config
        .collage_background_path
        .as_deref()
        .and_then(load_background)
        .map(Arc::new);

    let mirror = match config.mirror_api_base.as_deref() {
        Some(api_base) => {
            let page_base = config.mirror_page_base.as_deref().unwrap_or(api_base);
            info!("Comment mirroring enabled ({api_base})");
            Some(MirrorClient::new(api_base, page_base)?)
        }
        None => {
            info!("Comment mirroring disabled (MIRROR_API_BASE not set)");
            None
        }
    };

    // Build app state
    let state = AppState {
        canvas,
        translations,
        card_names,
        fetcher,
        background,
        mirror,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the collage background. A missing or unreadable file falls back to the
/// solid canvas colour rather than aborting startup.
fn load_background(path: &str) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(img) => {
            info!("Collage background loaded from {path}");
            Some(img.to_rgba8())
        }
        Err(e) => {
            warn!("Failed to load collage background {path}: {e}");
            None
        }
    }
}
