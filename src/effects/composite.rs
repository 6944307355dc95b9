use crate::effects::blend::{BlendFn, BlendOp, blend_pixel};
use crate::foundation::core::Raster;
use crate::foundation::error::RasterResult;

/// Source rectangle of a layer, in the layer image's own pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One positioned input of a composite. The layer owns its image until the merge consumes it.
#[derive(Debug)]
pub struct Layer {
    pub image: Raster,
    /// Canvas position of the clip rectangle's top-left corner. May be negative.
    pub x: i64,
    pub y: i64,
    pub clip: ClipRect,
}

impl Layer {
    /// Layer showing the whole image at `(x, y)`.
    pub fn new(image: Raster, x: i64, y: i64) -> Self {
        let clip = ClipRect {
            x: 0,
            y: 0,
            width: image.width(),
            height: image.height(),
        };
        Self { image, x, y, clip }
    }

    pub fn with_clip(mut self, clip: ClipRect) -> Self {
        self.clip = clip;
        self
    }
}

/// Canvas size for a layer stack: the component-wise maximum of the layer image sizes.
///
/// Offsets do not grow the canvas. Returns `None` for an empty stack.
pub fn canvas_size(layers: &[Layer]) -> Option<(u32, u32)> {
    layers.iter().fold(None, |acc, l| {
        let (w, h) = l.image.dimensions();
        Some(acc.map_or((w, h), |(aw, ah): (u32, u32)| (aw.max(w), ah.max(h))))
    })
}

/// Merge `layers` into a new `width`×`height` raster.
///
/// The first layer is copied onto a transparent canvas; every later layer is blended on top in
/// order with `op`. All layer images are released before this returns.
#[tracing::instrument(skip(layers), fields(layer_count = layers.len()))]
pub fn merge_layers(
    layers: Vec<Layer>,
    op: BlendOp,
    width: u32,
    height: u32,
) -> RasterResult<Raster> {
    let mut canvas = Raster::new(width, height)?;
    let kernel = op.kernel();

    for (idx, layer) in layers.iter().enumerate() {
        if idx == 0 {
            paint_layer(&mut canvas, layer, |d, s| d.copy_from_slice(s));
        } else {
            paint_layer(&mut canvas, layer, |d, s| blend_row(d, s, kernel));
        }
    }

    drop(layers);
    Ok(canvas)
}

fn blend_row(dst: &mut [u8], src: &[u8], kernel: BlendFn) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        blend_pixel(d, s, kernel);
    }
}

/// Visit the rows where `layer`'s clip overlaps the canvas, handing matching byte runs to `row`.
fn paint_layer(canvas: &mut Raster, layer: &Layer, mut row: impl FnMut(&mut [u8], &[u8])) {
    let (iw, ih) = layer.image.dimensions();
    let clip = layer.clip;

    // Clip rectangle limited to the image.
    let cx0 = i64::from(clip.x.min(iw));
    let cy0 = i64::from(clip.y.min(ih));
    let cx1 = (cx0 + i64::from(clip.width)).min(i64::from(iw));
    let cy1 = (cy0 + i64::from(clip.height)).min(i64::from(ih));

    // Canvas span covered by the clip, limited to the canvas. Offsets may be anywhere in i64.
    let (cw, ch) = canvas.dimensions();
    let x0 = layer.x.max(0);
    let y0 = layer.y.max(0);
    let x1 = layer.x.saturating_add(cx1 - cx0).min(i64::from(cw));
    let y1 = layer.y.saturating_add(cy1 - cy0).min(i64::from(ch));
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    // Past this point the layer overlaps the canvas, so `x0 - layer.x` is below the image width.

    let run = ((x1 - x0) as usize) * 4;
    let src_x = (cx0 + (x0 - layer.x)) as usize;
    let canvas_stride = cw as usize * 4;
    let image_stride = iw as usize * 4;
    let src = layer.image.pixels();
    let dst = canvas.pixels_mut();

    for y in y0..y1 {
        let sy = (cy0 + (y - layer.y)) as usize;
        let d_off = (y as usize) * canvas_stride + (x0 as usize) * 4;
        let s_off = sy * image_stride + src_x * 4;
        row(&mut dst[d_off..d_off + run], &src[s_off..s_off + run]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
