//! Card-size optimizer: picks one shared cell size for both groups.
//!
//! Candidates are tried largest first; the first size whose full vertical stack
//! fits the canvas wins. When nothing fits, the floor size is returned and the
//! grids are allowed to overflow the canvas rather than failing the request.

use tracing::{debug, warn};

use crate::layout::canvas::CanvasConfig;
use crate::layout::grid::solve_grid;

/// Total height needed to stack both groups at `cell_size`:
/// top padding, title, spacing, grid 1, two section gaps, title, spacing, grid 2,
/// bottom padding. Saturates at `u32::MAX`.
pub fn required_height(count1: u32, count2: u32, cell_size: u32, canvas: &CanvasConfig) -> u32 {
    let max_width = canvas.max_grid_width();
    let grid1 = solve_grid(
        count1,
        cell_size,
        max_width,
        canvas.grid_spacing,
        canvas.max_cols,
    );
    let grid2 = solve_grid(
        count2,
        cell_size,
        max_width,
        canvas.grid_spacing,
        canvas.max_cols,
    );

    [
        canvas.top_padding,
        canvas.title_height,
        canvas.section_spacing,
        grid1.total_height,
        canvas.section_spacing.saturating_mul(2),
        canvas.title_height,
        canvas.section_spacing,
        grid2.total_height,
        canvas.bottom_padding,
    ]
    .into_iter()
    .fold(0, u32::saturating_add)
}

/// Returns the largest candidate cell size at which both groups fit the canvas.
///
/// Falls back to `canvas.min_card_size` when even the smallest candidate is too
/// tall. That fallback can overflow the canvas; it is not treated as an error.
pub fn find_optimal_size(count1: u32, count2: u32, canvas: &CanvasConfig) -> u32 {
    let max_width = canvas.max_grid_width();

    let chosen = canvas
        .candidate_sizes
        .iter()
        .copied()
        .filter(|&size| size <= max_width)
        .find(|&size| required_height(count1, count2, size, canvas) <= canvas.height);

    match chosen {
        Some(size) => {
            debug!(count1, count2, size, "selected collage card size");
            size
        }
        None => {
            warn!(
                count1,
                count2,
                floor = canvas.min_card_size,
                "no candidate card size fits the canvas, using floor size"
            );
            canvas.min_card_size
        }
    }
}
