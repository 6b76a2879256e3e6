//! Collage composition: draws fetched card images onto the canvas at the planned
//! positions and encodes the scaled result as PNG.
//!
//! CPU-bound. Handlers run `compose_collage` inside `tokio::task::spawn_blocking`.

use std::io::Cursor;

use bytes::Bytes;
use image::{
    imageops, imageops::FilterType, DynamicImage, ImageError, ImageFormat, Rgba, RgbaImage,
};
use tracing::warn;

use crate::layout::{CollagePlan, Position};

const BACKGROUND_COLOR: Rgba<u8> = Rgba([24, 28, 38, 255]);
const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([88, 94, 108, 255]);

/// Social-preview output size.
pub const OUTPUT_WIDTH: u32 = 1200;
pub const OUTPUT_HEIGHT: u32 = 630;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl Default for OutputSize {
    fn default() -> Self {
        Self {
            width: OUTPUT_WIDTH,
            height: OUTPUT_HEIGHT,
        }
    }
}

/// Renders the collage and returns PNG bytes at `output` size.
///
/// `group1` and `group2` are zipped with the plan's positions; a `None` slot or an
/// undecodable image is drawn as a placeholder tile.
pub fn compose_collage(
    plan: &CollagePlan,
    group1: &[Option<Bytes>],
    group2: &[Option<Bytes>],
    background: Option<&RgbaImage>,
    output: OutputSize,
) -> Result<Vec<u8>, ImageError> {
    let canvas = render_canvas(plan, group1, group2, background);
    let scaled = imageops::resize(&canvas, output.width, output.height, FilterType::Triangle);

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(scaled).write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Draws the unscaled canvas.
pub fn render_canvas(
    plan: &CollagePlan,
    group1: &[Option<Bytes>],
    group2: &[Option<Bytes>],
    background: Option<&RgbaImage>,
) -> RgbaImage {
    let mut canvas = match background {
        Some(bg) => imageops::resize(
            bg,
            plan.canvas_width,
            plan.canvas_height,
            FilterType::Triangle,
        ),
        None => RgbaImage::from_pixel(plan.canvas_width, plan.canvas_height, BACKGROUND_COLOR),
    };

    let size = plan.card_size();
    draw_group(&mut canvas, &plan.group1, group1, size);
    draw_group(&mut canvas, &plan.group2, group2, size);
    canvas
}

fn draw_group(
    canvas: &mut RgbaImage,
    positions: &[Position],
    images: &[Option<Bytes>],
    size: u32,
) {
    for (index, position) in positions.iter().enumerate() {
        let tile = images
            .get(index)
            .and_then(Option::as_ref)
            .and_then(|bytes| card_tile(bytes, size))
            .unwrap_or_else(|| placeholder_tile(size));

        imageops::overlay(canvas, &tile, i64::from(position.x), i64::from(position.y));
    }
}

/// Decodes a card image and fits it inside a `size` square, centred, keeping its
/// aspect ratio. Returns `None` for undecodable data.
fn card_tile(bytes: &[u8], size: u32) -> Option<RgbaImage> {
    let decoded = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            warn!(error = %e, "card image could not be decoded, drawing placeholder");
            return None;
        }
    };

    let fitted = decoded.resize(size, size, FilterType::Triangle).to_rgba8();
    let mut tile = RgbaImage::new(size, size);
    let offset_x = size.saturating_sub(fitted.width()) / 2;
    let offset_y = size.saturating_sub(fitted.height()) / 2;
    imageops::overlay(&mut tile, &fitted, i64::from(offset_x), i64::from(offset_y));
    Some(tile)
}

fn placeholder_tile(size: u32) -> RgbaImage {
    RgbaImage::from_pixel(size, size, PLACEHOLDER_COLOR)
}
