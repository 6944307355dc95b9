use std::f64::consts::TAU;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::foundation::core::Raster;
use crate::foundation::error::{RasterError, RasterResult};

/// Quarter-turn rotations, clockwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Identity,
    Cw90,
    Cw180,
    Cw270,
}

/// Bucket an angle in radians into the quarter-turn arc centered on the nearest axis.
///
/// `(7τ/8, τ) ∪ [0, τ/8)` is the identity; `7τ/8` itself still rotates by 270°.
pub fn rotation_for_angle(angle: f64) -> Rotation {
    const ARC: f64 = TAU / 8.0;
    let a = if angle.is_finite() {
        angle.rem_euclid(TAU)
    } else {
        0.0
    };
    if a > 7.0 * ARC || a < ARC {
        Rotation::Identity
    } else if a < 3.0 * ARC {
        Rotation::Cw90
    } else if a < 5.0 * ARC {
        Rotation::Cw180
    } else {
        Rotation::Cw270
    }
}

fn into_image(raster: Raster) -> RasterResult<RgbaImage> {
    let (w, h) = raster.dimensions();
    RgbaImage::from_raw(w, h, raster.into_premul_rgba8())
        .ok_or_else(|| RasterError::evaluation("raster buffer does not match its dimensions"))
}

fn from_image(img: RgbaImage) -> RasterResult<Raster> {
    let (w, h) = img.dimensions();
    Raster::from_premul_rgba8(w, h, img.into_raw())
}

/// Flip top↔bottom when `vertical`, left↔right otherwise. Consumes `raster`.
pub fn mirror(raster: Raster, vertical: bool) -> RasterResult<Raster> {
    let img = into_image(raster)?;
    let out = if vertical {
        imageops::flip_vertical(&img)
    } else {
        imageops::flip_horizontal(&img)
    };
    from_image(out)
}

/// Rotate clockwise. [`Rotation::Identity`] hands back `raster` itself.
pub fn rotate(raster: Raster, rotation: Rotation) -> RasterResult<Raster> {
    let out = match rotation {
        Rotation::Identity => return Ok(raster),
        Rotation::Cw90 => imageops::rotate90(&into_image(raster)?),
        Rotation::Cw180 => imageops::rotate180(&into_image(raster)?),
        Rotation::Cw270 => imageops::rotate270(&into_image(raster)?),
    };
    from_image(out)
}

/// Resample to exactly `width`×`height`.
///
/// Filtering runs on premultiplied data so transparent pixels do not bleed color.
pub fn scale(raster: Raster, width: u32, height: u32) -> RasterResult<Raster> {
    if width == 0 || height == 0 {
        return Err(RasterError::validation(format!(
            "scale target must be non-zero, got {width}x{height}"
        )));
    }
    if raster.dimensions() == (width, height) {
        return copy(&raster);
    }
    let img = into_image(raster)?;
    from_image(imageops::resize(&img, width, height, FilterType::Triangle))
}

/// Repeat `raster` from the origin to fill exactly `width`×`height`.
pub fn tile(raster: Raster, width: u32, height: u32) -> RasterResult<Raster> {
    let mut out = Raster::new(width, height)?;
    let (sw, sh) = raster.dimensions();
    let src = raster.pixels();
    let src_stride = sw as usize * 4;
    let dst_stride = width as usize * 4;
    let dst = out.pixels_mut();

    for y in 0..height as usize {
        let src_row = &src[(y % sh as usize) * src_stride..][..src_stride];
        let dst_row = &mut dst[y * dst_stride..][..dst_stride];
        for chunk in dst_row.chunks_mut(src_stride) {
            chunk.copy_from_slice(&src_row[..chunk.len()]);
        }
    }
    Ok(out)
}

fn copy(raster: &Raster) -> RasterResult<Raster> {
    Raster::from_premul_rgba8(raster.width(), raster.height(), raster.pixels().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transform.rs"]
mod tests;
