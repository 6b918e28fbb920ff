use image::{RgbaImage, imageops};

use crate::layout::grouper::{Facing, ZoomLevel};

/// Rows skipped at the top of every background before zooming.
pub const BACKGROUND_CROP_TOP: u32 = 80;
/// Panels all share the close-up background framing, whatever their sprite zoom.
pub const BACKGROUND_ZOOM: ZoomLevel = ZoomLevel::Close;

/// Sprite height in a two-character panel.
pub const TWO_SHOT_SPRITE_HEIGHT: u32 = 180;
/// `floor(0.9166 * 180 + 1)`.
pub const TWO_SHOT_SPRITE_WIDTH: u32 = 165;

/// Sprite offset from the left edge in a single-character panel.
pub const SINGLE_SHOT_X: f64 = -40.0;
/// Sprite offset above the bottom edge in a single-character panel.
pub const SINGLE_SHOT_RISE: f64 = 200.0;
/// Sprite top in a two-character panel.
pub const TWO_SHOT_TOP: f64 = 150.0;

const RESIZE_FILTER: imageops::FilterType = imageops::FilterType::Triangle;

/// Crop a band of `background` below [`BACKGROUND_CROP_TOP`] and stretch it back to full size.
///
/// The band spans the full width and `height * zoom.background_scale()` rows, clamped to what
/// the image actually has.
pub fn zoom_background(background: &RgbaImage, zoom: ZoomLevel) -> RgbaImage {
    let (w, h) = background.dimensions();
    if w == 0 || h == 0 {
        return background.clone();
    }

    let top = BACKGROUND_CROP_TOP.min(h - 1);
    let band = (f64::from(h) * zoom.background_scale()).floor() as u32;
    let band = band.clamp(1, h - top);

    let cropped = imageops::crop_imm(background, 0, top, w, band).to_image();
    imageops::resize(&cropped, w, h, RESIZE_FILTER)
}

/// Frame a character sprite for the given zoom, mirrored when it faces left.
///
/// Close-ups keep the top half of the sprite at native size. Medium shots scale the whole sprite
/// to [`TWO_SHOT_SPRITE_WIDTH`] x [`TWO_SHOT_SPRITE_HEIGHT`].
pub fn frame_sprite(sprite: &RgbaImage, zoom: ZoomLevel, facing: Facing) -> RgbaImage {
    let mut framed = match zoom {
        ZoomLevel::Close => {
            let (w, h) = sprite.dimensions();
            let half = (h / 2).max(1).min(h);
            imageops::crop_imm(sprite, 0, 0, w, half).to_image()
        }
        ZoomLevel::Medium => imageops::resize(
            sprite,
            TWO_SHOT_SPRITE_WIDTH,
            TWO_SHOT_SPRITE_HEIGHT,
            RESIZE_FILTER,
        ),
    };
    if facing.is_flipped() {
        imageops::flip_horizontal_in_place(&mut framed);
    }
    framed
}

#[cfg(test)]
#[path = "../../tests/unit/compile/framing.rs"]
mod tests;
