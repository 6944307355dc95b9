use std::f64::consts::TAU;

use crate::assets::color::parse_color;
use crate::foundation::core::{Raster, Rgba8Premul};
use crate::foundation::error::RasterResult;
use crate::foundation::numeric::float_exact;

/// Base gradient axes. Back-half angles reuse these with the stop list reversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientDirection {
    LeftToRight,
    TopToBottom,
    TopLeftToBottomRight,
    BottomLeftToTopRight,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stop {
    pub color: Rgba8Premul,
    /// Position along the gradient axis in `[0, 1]`.
    pub offset: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GradientSpec {
    pub direction: GradientDirection,
    /// Already applied to `stops`; kept for diagnostics.
    pub reverse: bool,
    pub stops: Vec<Stop>,
}

/// Map an angle in radians to a direction and reverse flag.
///
/// The circle is cut into 16 arcs of `τ/16`. Each base direction owns the two arcs around its
/// angle and its opposite; the opposite half sets `reverse`. Edges belong to the arc that starts
/// there, except `15τ/16` which closes the last arc.
pub fn bucket_angle(angle: f64) -> (GradientDirection, bool) {
    use GradientDirection::*;

    const ARC: f64 = TAU / 16.0;
    let a = if angle.is_finite() {
        angle.rem_euclid(TAU)
    } else {
        0.0
    };

    if a > 15.0 * ARC || a < ARC {
        (LeftToRight, false)
    } else if a < 3.0 * ARC {
        (TopLeftToBottomRight, false)
    } else if a < 5.0 * ARC {
        (TopToBottom, false)
    } else if a < 7.0 * ARC {
        (BottomLeftToTopRight, true)
    } else if a < 9.0 * ARC {
        (LeftToRight, true)
    } else if a < 11.0 * ARC {
        (TopLeftToBottomRight, true)
    } else if a < 13.0 * ARC {
        (TopToBottom, true)
    } else {
        (BottomLeftToTopRight, false)
    }
}

/// Build stops from whitespace-separated color and offset lists.
///
/// Unparsable colors and offsets are dropped. With offsets present the shorter list wins;
/// without any usable offset the colors are spread evenly over `[0, 1]`.
pub fn synthesize_stops(colors: &str, offsets: Option<&str>) -> Vec<Stop> {
    let colors: Vec<Rgba8Premul> = colors
        .split_ascii_whitespace()
        .filter_map(parse_color)
        .collect();
    let offsets: Vec<f64> = offsets
        .map(|s| s.split_ascii_whitespace().filter_map(float_exact).collect())
        .unwrap_or_default();

    if offsets.is_empty() {
        let last = colors.len().saturating_sub(1).max(1) as f64;
        return colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| Stop {
                color,
                offset: i as f64 / last,
            })
            .collect();
    }

    colors
        .into_iter()
        .zip(offsets)
        .map(|(color, offset)| Stop {
            color,
            offset: offset.clamp(0.0, 1.0),
        })
        .collect()
}

/// Reverse stop order and mirror every offset to `1 - offset`.
pub fn reverse_stops(stops: &mut [Stop]) {
    stops.reverse();
    for s in stops.iter_mut() {
        s.offset = 1.0 - s.offset;
    }
}

impl GradientSpec {
    /// Gradient for `angle` radians, or `None` with fewer than two usable stops.
    pub fn new(angle: f64, colors: &str, offsets: Option<&str>) -> Option<Self> {
        let (direction, reverse) = bucket_angle(angle);
        let mut stops = synthesize_stops(colors, offsets);
        if stops.len() < 2 {
            return None;
        }
        if reverse {
            reverse_stops(&mut stops);
        }
        Some(Self {
            direction,
            reverse,
            stops,
        })
    }

    /// Color at axis position `t`.
    pub fn sample(&self, t: f64) -> Rgba8Premul {
        let Some(first) = self.stops.first() else {
            return Rgba8Premul::transparent();
        };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                if b.offset <= a.offset {
                    return b.color;
                }
                return lerp(a.color, b.color, (t - a.offset) / (b.offset - a.offset));
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    /// Render into a new `width`×`height` raster.
    pub fn render(&self, width: u32, height: u32) -> RasterResult<Raster> {
        let mut out = Raster::new(width, height)?;
        let span = |n: u32| f64::from(n.saturating_sub(1).max(1));
        let (sx, sy) = (span(width), span(height));

        let stride = width as usize * 4;
        let pixels = out.pixels_mut();
        for y in 0..height {
            let fy = f64::from(y) / sy;
            let row = &mut pixels[y as usize * stride..(y as usize + 1) * stride];
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let fx = x as f64 / sx;
                let t = match self.direction {
                    GradientDirection::LeftToRight => fx,
                    GradientDirection::TopToBottom => fy,
                    GradientDirection::TopLeftToBottomRight => (fx + fy) * 0.5,
                    GradientDirection::BottomLeftToTopRight => (fx + 1.0 - fy) * 0.5,
                };
                px.copy_from_slice(&self.sample(t).to_array());
            }
        }
        Ok(out)
    }
}

fn lerp(a: Rgba8Premul, b: Rgba8Premul, t: f64) -> Rgba8Premul {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    Rgba8Premul {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
        a: mix(a.a, b.a),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
