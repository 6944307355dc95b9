use anyhow::Context;

use crate::foundation::core::{MAX_DIMENSION, Raster};
use crate::foundation::error::{RasterError, RasterResult};

/// Decode an encoded raster (PNG, JPEG, GIF, ...) into a premultiplied raster.
pub fn decode_image(bytes: &[u8]) -> RasterResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Parse SVG bytes and rasterize them at the document's intrinsic size.
pub fn decode_svg(bytes: &[u8]) -> RasterResult<Raster> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    fn to_px(v: f32) -> RasterResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(RasterError::source("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(RasterError::source(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIMENSION}x{MAX_DIMENSION})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RasterError::source("failed to allocate svg pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Raster::from_premul_rgba8(width, height, pixmap.take())
}

/// Decode by file extension: `.svg` goes through the SVG rasterizer, everything else through
/// `image` format sniffing.
pub fn decode_for_path(path: &std::path::Path, bytes: &[u8]) -> RasterResult<Raster> {
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        decode_svg(bytes)
    } else {
        decode_image(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
