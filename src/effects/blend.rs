use std::fmt;

/// Blend kernel on un-premultiplied colors: `(src, dst) -> blended`.
///
/// Kernels only decide color. Coverage is handled by the premultiplied source-over in
/// [`blend_pixel`], so `|s, _| s` is plain alpha blending.
pub type BlendFn = fn([f32; 3], [f32; 3]) -> [f32; 3];

/// Named layer blend operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendOp {
    AlphaBlend,
    Allanon,
    Add,
    Sub,
    Diff,
    Darken,
    Lighten,
    Screen,
    Overlay,
    Multiply,
    Tint,
    Hue,
    Saturate,
    Value,
    Colorize,
}

impl BlendOp {
    pub const ALL: [BlendOp; 15] = [
        BlendOp::AlphaBlend,
        BlendOp::Allanon,
        BlendOp::Add,
        BlendOp::Sub,
        BlendOp::Diff,
        BlendOp::Darken,
        BlendOp::Lighten,
        BlendOp::Screen,
        BlendOp::Overlay,
        BlendOp::Multiply,
        BlendOp::Tint,
        BlendOp::Hue,
        BlendOp::Saturate,
        BlendOp::Value,
        BlendOp::Colorize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlendOp::AlphaBlend => "alphablend",
            BlendOp::Allanon => "allanon",
            BlendOp::Add => "add",
            BlendOp::Sub => "sub",
            BlendOp::Diff => "diff",
            BlendOp::Darken => "darken",
            BlendOp::Lighten => "lighten",
            BlendOp::Screen => "screen",
            BlendOp::Overlay => "overlay",
            BlendOp::Multiply => "multiply",
            BlendOp::Tint => "tint",
            BlendOp::Hue => "hue",
            BlendOp::Saturate => "saturate",
            BlendOp::Value => "value",
            BlendOp::Colorize => "colorize",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Resolve a name, falling back to [`BlendOp::AlphaBlend`] for unknown ops.
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(op = name, "unknown blend op, using alphablend");
            BlendOp::AlphaBlend
        })
    }

    /// The color kernel for this op. Resolve once per composite, not per pixel.
    pub fn kernel(self) -> BlendFn {
        match self {
            BlendOp::AlphaBlend => |s, _| s,
            BlendOp::Allanon => |s, d| zip(s, d, |s, d| (s + d) * 0.5),
            BlendOp::Add => |s, d| zip(s, d, |s, d| (s + d).min(1.0)),
            BlendOp::Sub => |s, d| zip(s, d, |s, d| (d - s).max(0.0)),
            BlendOp::Diff => |s, d| zip(s, d, |s, d| (d - s).abs()),
            BlendOp::Darken => |s, d| zip(s, d, f32::min),
            BlendOp::Lighten => |s, d| zip(s, d, f32::max),
            BlendOp::Screen => |s, d| zip(s, d, |s, d| s + d - s * d),
            BlendOp::Overlay => |s, d| {
                zip(s, d, |s, d| {
                    if d <= 0.5 {
                        2.0 * s * d
                    } else {
                        1.0 - 2.0 * (1.0 - s) * (1.0 - d)
                    }
                })
            },
            BlendOp::Multiply => |s, d| zip(s, d, |s, d| s * d),
            BlendOp::Tint => |s, d| zip(s, d, |s, d| (2.0 * s * d).min(1.0)),
            BlendOp::Hue => |s, d| {
                let (sh, ss, _) = rgb_to_hsv(s);
                let (dh, ds, dv) = rgb_to_hsv(d);
                // Grey sources carry no hue.
                let h = if ss > 0.0 { sh } else { dh };
                hsv_to_rgb(h, ds, dv)
            },
            BlendOp::Saturate => |s, d| {
                let (_, ss, _) = rgb_to_hsv(s);
                let (dh, _, dv) = rgb_to_hsv(d);
                hsv_to_rgb(dh, ss, dv)
            },
            BlendOp::Value => |s, d| {
                let (_, _, sv) = rgb_to_hsv(s);
                let (dh, ds, _) = rgb_to_hsv(d);
                hsv_to_rgb(dh, ds, sv)
            },
            BlendOp::Colorize => |s, d| {
                let (sh, ss, _) = rgb_to_hsv(s);
                let (_, _, dv) = rgb_to_hsv(d);
                hsv_to_rgb(sh, ss, dv)
            },
        }
    }
}

impl fmt::Display for BlendOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn zip(s: [f32; 3], d: [f32; 3], f: impl Fn(f32, f32) -> f32) -> [f32; 3] {
    [f(s[0], d[0]), f(s[1], d[1]), f(s[2], d[2])]
}

/// Source-over one premultiplied RGBA8 pixel onto another with `kernel` deciding the color
/// where both are covered:
///
/// out_a = sa + da * (1 - sa)
/// out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
pub fn blend_pixel(d: &mut [u8], s: &[u8], kernel: BlendFn) {
    let sa = f32::from(s[3]) / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = f32::from(d[3]) / 255.0;

    let sp = [s[0], s[1], s[2]].map(|c| f32::from(c) / 255.0);
    let dp = [d[0], d[1], d[2]].map(|c| f32::from(c) / 255.0);
    let sc = sp.map(|c| (c / sa).clamp(0.0, 1.0));
    let dc = if da > 0.0 {
        dp.map(|c| (c / da).clamp(0.0, 1.0))
    } else {
        [0.0; 3]
    };

    let b = kernel(sc, dc).map(|c| c.clamp(0.0, 1.0));
    for c in 0..3 {
        let out = (sp[c] * (1.0 - da) + dp[c] * (1.0 - sa) + b[c] * sa * da).clamp(0.0, 1.0);
        d[c] = to_u8(out);
    }
    d[3] = to_u8((sa + da * (1.0 - sa)).clamp(0.0, 1.0));
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

pub(crate) fn rgb_to_hsv([r, g, b]: [f32; 3]) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max > 0.0 { delta / max } else { 0.0 };
    (h, s, max)
}

pub(crate) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [r + m, g + m, b + m]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blend.rs"]
mod tests;
