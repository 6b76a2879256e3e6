//! Canvas geometry for the two-group trade collage.
//!
//! All values are in canvas pixels. The canvas is drawn at 1536 × 1024 and only
//! scaled to the social-preview size after composition, so every constant here
//! refers to the unscaled canvas.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Canvas configuration
// ────────────────────────────────────────────────────────────────────────────

/// Fixed layout parameters for a collage canvas.
///
/// Layout is a vertical stack of four zones: title 1, grid 1, title 2, grid 2.
/// The grids share a single square cell size chosen by the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// Height of each title block (one per group).
    pub title_height: u32,
    /// Horizontal padding on each side; grids never extend into it.
    pub side_padding: u32,
    pub top_padding: u32,
    pub bottom_padding: u32,
    /// Vertical spacing used by the optimizer when checking whether a size fits.
    pub section_spacing: u32,
    /// Lower bound for each of the four gaps distributed by zone placement.
    pub min_zone_spacing: u32,
    /// Gap between adjacent cells inside a grid (both axes).
    pub grid_spacing: u32,
    /// Hard cap on columns per grid regardless of available width.
    pub max_cols: u32,
    /// Candidate cell sizes, strictly descending.
    pub candidate_sizes: Vec<u32>,
    /// Returned when no candidate fits. Cards may overflow the canvas at this size.
    pub min_card_size: u32,
}

impl CanvasConfig {
    /// Width available to a grid after removing side padding.
    pub fn max_grid_width(&self) -> u32 {
        self.width.saturating_sub(self.side_padding * 2)
    }
}

pub const CANVAS_WIDTH: u32 = 1536;
pub const CANVAS_HEIGHT: u32 = 1024;
pub const TITLE_HEIGHT: u32 = 70;
pub const MIN_CARD_SIZE: u32 = 40;

const LARGEST_CANDIDATE: u32 = 200;
const SMALLEST_CANDIDATE: u32 = 50;
const CANDIDATE_STEP: usize = 10;

/// Returns the canvas used for trade-listing previews.
///
/// 1536 × 1024 canvas, 70px titles, 40px side padding (1456px usable width),
/// candidate cells 200px down to 50px in 10px steps, 40px floor.
pub fn default_canvas_config() -> CanvasConfig {
    CanvasConfig {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        title_height: TITLE_HEIGHT,
        side_padding: 40,
        top_padding: 20,
        bottom_padding: 20,
        section_spacing: 20,
        min_zone_spacing: 20,
        grid_spacing: 10,
        max_cols: 10,
        candidate_sizes: (SMALLEST_CANDIDATE..=LARGEST_CANDIDATE)
            .rev()
            .step_by(CANDIDATE_STEP)
            .collect(),
        min_card_size: MIN_CARD_SIZE,
    }
}
