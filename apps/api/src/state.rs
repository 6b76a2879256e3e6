use std::sync::Arc;

use image::RgbaImage;

use crate::card_names::CardNameCache;
use crate::collage::fetch::ImageFetcher;
use crate::i18n::Translations;
use crate::layout::CanvasConfig;
use crate::mirror::MirrorClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Collage canvas geometry. Fixed at startup to the 1536 × 1024 preview canvas.
    pub canvas: CanvasConfig,
    pub translations: Arc<Translations>,
    pub card_names: Arc<CardNameCache>,
    pub fetcher: ImageFetcher,
    /// Decoded collage background, scaled to the canvas at render time.
    pub background: Option<Arc<RgbaImage>>,
    /// `None` when `MIRROR_API_BASE` is not configured.
    pub mirror: Option<MirrorClient>,
}
