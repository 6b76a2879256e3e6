//! Collage plan: zones plus concrete card positions for both groups.
//!
//! Grids are centred horizontally on the canvas and placed at the zone 2 and
//! zone 4 offsets. Positions are sliced to each group's card count so the
//! compositor can zip them with the fetched images directly.

use serde::{Deserialize, Serialize};

use crate::layout::canvas::CanvasConfig;
use crate::layout::grid::{grid_positions, GridLayout, Position};
use crate::layout::zones::{layout_zones, ZoneLayout};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollagePlan {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub zones: ZoneLayout,
    pub group1: Vec<Position>,
    pub group2: Vec<Position>,
}

impl CollagePlan {
    pub fn card_size(&self) -> u32 {
        self.zones.optimal_card_size
    }
}

pub fn plan_collage(count1: u32, count2: u32, canvas: &CanvasConfig) -> CollagePlan {
    let zones = layout_zones(count1, count2, canvas);

    let group1 = place_group(&zones.layout1, count1, zones.zone2_y, canvas);
    let group2 = place_group(&zones.layout2, count2, zones.zone4_y, canvas);

    CollagePlan {
        canvas_width: canvas.width,
        canvas_height: canvas.height,
        zones,
        group1,
        group2,
    }
}

fn place_group(
    layout: &GridLayout,
    count: u32,
    origin_y: u32,
    canvas: &CanvasConfig,
) -> Vec<Position> {
    let origin_x = canvas.width.saturating_sub(layout.total_width) / 2;
    grid_positions(layout, origin_x, origin_y)
        .take(count.min(layout.capacity()) as usize)
        .collect()
}
