// Collage geometry: shared cell-size search, zone placement, grid positions.
// Pure and synchronous; the compositor consumes the resulting plan.

pub mod canvas;
pub mod grid;
pub mod optimizer;
pub mod placement;
pub mod zones;

// Re-export the public API consumed by the collage handlers and compositor.
pub use canvas::{default_canvas_config, CanvasConfig};
pub use grid::Position;
pub use placement::{plan_collage, CollagePlan};
