//! Zone placement: vertical offsets for the two titles and the two grids.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::canvas::CanvasConfig;
use crate::layout::grid::{solve_grid, GridLayout};
use crate::layout::optimizer::find_optimal_size;

/// Vertical arrangement of the canvas.
///
/// Zone 1 is the first title, zone 2 the first grid, zone 3 the second title,
/// zone 4 the second grid. Offsets increase strictly from zone 1 to zone 4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneLayout {
    /// Gap applied between consecutive zones.
    pub spacing: u32,
    pub zone1_y: u32,
    pub zone2_y: u32,
    pub zone3_y: u32,
    pub zone4_y: u32,
    pub zone2_height: u32,
    pub zone4_height: u32,
    pub optimal_card_size: u32,
    pub layout1: GridLayout,
    pub layout2: GridLayout,
}

impl ZoneLayout {
    /// Bottom edge of the second grid.
    pub fn content_bottom(&self) -> u32 {
        self.zone4_y.saturating_add(self.zone4_height)
    }
}

/// Computes the zone layout for two groups of `count1` and `count2` cards.
///
/// Leftover height is split across four gaps, each at least
/// `canvas.min_zone_spacing`. When the optimizer fell back to its floor size the
/// second grid may extend past the canvas bottom.
pub fn layout_zones(count1: u32, count2: u32, canvas: &CanvasConfig) -> ZoneLayout {
    let optimal_card_size = find_optimal_size(count1, count2, canvas);
    let max_width = canvas.max_grid_width();

    let layout1 = solve_grid(
        count1,
        optimal_card_size,
        max_width,
        canvas.grid_spacing,
        canvas.max_cols,
    );
    let layout2 = solve_grid(
        count2,
        optimal_card_size,
        max_width,
        canvas.grid_spacing,
        canvas.max_cols,
    );

    let used_height = canvas
        .title_height
        .saturating_mul(2)
        .saturating_add(layout1.total_height)
        .saturating_add(layout2.total_height);
    let remaining_space = canvas.height.saturating_sub(used_height);
    let spacing = (remaining_space / 4).max(canvas.min_zone_spacing);

    let zone1_y = 0;
    let zone2_y = offset_after(zone1_y, canvas.title_height, spacing);
    let zone3_y = offset_after(zone2_y, layout1.total_height, spacing);
    let zone4_y = offset_after(zone3_y, canvas.title_height, spacing);

    let zones = ZoneLayout {
        spacing,
        zone1_y,
        zone2_y,
        zone3_y,
        zone4_y,
        zone2_height: layout1.total_height,
        zone4_height: layout2.total_height,
        optimal_card_size,
        layout1,
        layout2,
    };

    if zones.content_bottom() > canvas.height {
        debug!(
            count1,
            count2,
            bottom = zones.content_bottom(),
            "second grid extends past the canvas"
        );
    }

    zones
}

/// Start of the zone following one at `start` with the given height.
fn offset_after(start: u32, height: u32, spacing: u32) -> u32 {
    start.saturating_add(height).saturating_add(spacing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::default_canvas_config;

    #[test]
    fn test_zones_strictly_increase() {
        let canvas = default_canvas_config();
        for (count1, count2) in [(1, 0), (0, 1), (1, 1), (5, 20), (12, 3), (100, 100)] {
            let zones = layout_zones(count1, count2, &canvas);
            assert!(zones.zone1_y < zones.zone2_y, "{count1}/{count2}");
            assert!(zones.zone2_y < zones.zone3_y, "{count1}/{count2}");
            assert!(zones.zone3_y < zones.zone4_y, "{count1}/{count2}");
        }
    }

    #[test]
    fn test_leftover_space_split_evenly() {
        let canvas = default_canvas_config();
        let zones = layout_zones(1, 1, &canvas);
        // Two 70px titles and two 200px grids leave 1024 - 540 = 484px.
        assert_eq!(zones.optimal_card_size, 200);
        assert_eq!(zones.spacing, 121);
        assert_eq!(zones.zone2_y, 70 + 121);
        assert_eq!(zones.zone3_y, 191 + 200 + 121);
        assert_eq!(zones.zone4_y, 512 + 70 + 121);
        assert!(zones.content_bottom() <= canvas.height);
    }

    #[test]
    fn test_fitting_content_stays_on_canvas() {
        let canvas = default_canvas_config();
        for (count1, count2) in [(3, 4), (5, 20), (10, 10), (30, 2)] {
            let zones = layout_zones(count1, count2, &canvas);
            assert!(
                zones.content_bottom() <= canvas.height,
                "{count1}/{count2} bottom={}",
                zones.content_bottom()
            );
        }
    }

    #[test]
    fn test_spacing_never_below_minimum() {
        let canvas = default_canvas_config();
        let zones = layout_zones(100, 100, &canvas);
        assert_eq!(zones.optimal_card_size, canvas.min_card_size);
        assert_eq!(zones.spacing, canvas.min_zone_spacing);
    }

    #[test]
    fn test_zone_heights_match_grids() {
        let canvas = default_canvas_config();
        let zones = layout_zones(4, 9, &canvas);
        assert_eq!(zones.zone2_height, zones.layout1.total_height);
        assert_eq!(zones.zone4_height, zones.layout2.total_height);
        assert_eq!(zones.layout1.card_size, zones.optimal_card_size);
        assert_eq!(zones.layout2.card_size, zones.optimal_card_size);
    }

    #[test]
    fn test_huge_counts_do_not_overflow() {
        let canvas = default_canvas_config();
        let zones = layout_zones(1_000_000_000, 1_000_000_000, &canvas);
        assert_eq!(zones.optimal_card_size, canvas.min_card_size);
        assert_eq!(zones.spacing, canvas.min_zone_spacing);
        assert_eq!(zones.zone2_y, canvas.title_height + canvas.min_zone_spacing);
        assert_eq!(zones.content_bottom(), u32::MAX);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let canvas = default_canvas_config();
        assert_eq!(layout_zones(7, 13, &canvas), layout_zones(7, 13, &canvas));
    }
}
