//! Grid solver and position emitter for a single group of cards.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Geometry of one group's card grid.
///
/// Invariants for a non-empty layout: `rows * cols >= count` and the last row is
/// never entirely empty (`rows * cols - count < cols`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: u32,
    pub cols: u32,
    pub card_size: u32,
    pub spacing: u32,
    pub total_width: u32,
    pub total_height: u32,
}

impl GridLayout {
    /// Number of cells in the grid, including unused trailing cells.
    pub fn capacity(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }

    fn empty(card_size: u32, spacing: u32) -> Self {
        Self {
            card_size,
            spacing,
            ..Self::default()
        }
    }
}

/// Absolute top-left corner of one card on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

/// Computes how many columns and rows `count` square cells of `cell_size` need.
///
/// Columns are limited by the count itself, by `max_cols`, and by how many cells
/// (with gaps) fit into `max_width`. A zero count, or a cell too wide to fit even
/// once, yields an all-zero grid. Dimensions saturate at `u32::MAX` for counts
/// too large to measure.
pub fn solve_grid(
    count: u32,
    cell_size: u32,
    max_width: u32,
    spacing: u32,
    max_cols: u32,
) -> GridLayout {
    if count == 0 {
        return GridLayout::empty(cell_size, spacing);
    }

    let fitting_cols =
        max_width.saturating_add(spacing) / cell_size.saturating_add(spacing).max(1);
    let cols = count.min(max_cols).min(fitting_cols);
    if cols == 0 {
        debug!(count, cell_size, max_width, "cell does not fit grid width");
        return GridLayout::empty(cell_size, spacing);
    }

    let rows = count.div_ceil(cols);

    GridLayout {
        rows,
        cols,
        card_size: cell_size,
        spacing,
        total_width: span(cols, cell_size, spacing),
        total_height: span(rows, cell_size, spacing),
    }
}

/// Length covered by `n` cells and the `n - 1` gaps between them.
fn span(n: u32, cell_size: u32, spacing: u32) -> u32 {
    if n == 0 {
        0
    } else {
        n.saturating_mul(cell_size)
            .saturating_add((n - 1).saturating_mul(spacing))
    }
}

/// Emits the top-left corner of every cell in `layout`, row-major.
///
/// Always yields exactly `rows * cols` positions; callers take the first `count`
/// when the last row is only partly filled. Each call starts a fresh sequence.
pub fn grid_positions(
    layout: &GridLayout,
    origin_x: u32,
    origin_y: u32,
) -> impl Iterator<Item = Position> {
    let GridLayout {
        rows,
        cols,
        card_size,
        spacing,
        ..
    } = *layout;
    let step = card_size.saturating_add(spacing);

    (0..rows).flat_map(move |row| {
        (0..cols).map(move |col| Position {
            x: origin_x.saturating_add(col.saturating_mul(step)),
            y: origin_y.saturating_add(row.saturating_mul(step)),
        })
    })
}
