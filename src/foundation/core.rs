use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::foundation::error::{RasterError, RasterResult};

/// Largest width or height any operation will allocate.
pub const MAX_DIMENSION: u32 = 16_384;

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::default()
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn premul(c: u8, a: u8) -> u8 {
    (((u16::from(c) * u16::from(a)) + 127) / 255) as u8
}

fn unpremul(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
}

/// Counts raster creations and releases.
///
/// A ledger is attached to a [`Raster`] at most once. Attaching records one creation and dropping
/// the raster records one release, so `live() == 0` once every raster that passed through an
/// evaluation has been dropped.
#[derive(Clone, Debug, Default)]
pub struct RasterLedger {
    counts: Arc<LedgerCounts>,
}

#[derive(Debug, Default)]
struct LedgerCounts {
    created: AtomicUsize,
    released: AtomicUsize,
}

/// Point-in-time copy of a ledger's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// Rasters attached to the ledger.
    pub created: usize,
    /// Tracked rasters dropped so far.
    pub released: usize,
}

impl LedgerStats {
    /// Rasters created and not yet released.
    pub fn live(self) -> usize {
        self.created.saturating_sub(self.released)
    }
}

impl RasterLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the counters.
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            created: self.counts.created.load(Ordering::Relaxed),
            released: self.counts.released.load(Ordering::Relaxed),
        }
    }

    /// Shorthand for `stats().live()`.
    pub fn live(&self) -> usize {
        self.stats().live()
    }

    /// Attach this ledger to `raster` unless it is already tracked.
    pub fn track(&self, mut raster: Raster) -> Raster {
        if raster.ledger.is_none() {
            self.counts.created.fetch_add(1, Ordering::Relaxed);
            raster.ledger = Some(self.clone());
        }
        raster
    }

    fn record_release(&self) {
        self.counts.released.fetch_add(1, Ordering::Relaxed);
    }
}

/// Owned raster image: premultiplied RGBA8, row-major, tightly packed.
///
/// Rasters are move-only. Handing one to another owner moves it; dropping it releases the pixel
/// buffer and, when tracked, records the release on its ledger.
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
    ledger: Option<RasterLedger>,
}

impl Raster {
    /// Allocate a fully transparent raster.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
            ledger: None,
        })
    }

    /// Allocate a raster filled with one color.
    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> RasterResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: color.to_array().repeat(len / 4),
            ledger: None,
        })
    }

    /// Wrap an existing premultiplied RGBA8 buffer.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> RasterResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(RasterError::validation(format!(
                "raster buffer has {} bytes, expected {len} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            ledger: None,
        })
    }

    /// Wrap a straight-alpha RGBA8 buffer, premultiplying in place.
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> RasterResult<Self> {
        for px in data.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = premul(px[0], a);
            px[1] = premul(px[1], a);
            px[2] = premul(px[2], a);
        }
        Self::from_premul_rgba8(width, height, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Premultiplied RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied RGBA8 bytes. Callers must keep color channels at or below alpha.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data[idx..idx + 4];
        Some(Rgba8Premul {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Un-premultiplied RGBA8 copy, suitable for encoding.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = px[3];
            px[0] = unpremul(px[0], a);
            px[1] = unpremul(px[1], a);
            px[2] = unpremul(px[2], a);
        }
        out
    }

    /// Take the pixel buffer, releasing the raster.
    pub fn into_premul_rgba8(mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }

    /// Whether a [`RasterLedger`] records this raster's release.
    pub fn is_tracked(&self) -> bool {
        self.ledger.is_some()
    }
}

impl Drop for Raster {
    fn drop(&mut self) {
        if let Some(ledger) = self.ledger.take() {
            ledger.record_release();
        }
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tracked", &self.ledger.is_some())
            .finish_non_exhaustive()
    }
}

fn byte_len(width: u32, height: u32) -> RasterResult<usize> {
    if width == 0 || height == 0 {
        return Err(RasterError::validation(format!(
            "raster size must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RasterError::validation("raster buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
