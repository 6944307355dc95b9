use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::decode::decode_for_path;
use crate::assets::path::{expand_path, find_file};
use crate::eval::opts::EvalOpts;
use crate::foundation::core::Raster;
use crate::foundation::error::{RasterError, RasterResult};

/// Where `img` elements get their pixels from.
pub trait RasterSource {
    /// Load and decode the image named by an `src` attribute.
    fn load(&self, src: &str) -> RasterResult<Raster>;

    /// Capture the screen background, requested with `src="xroot:"`.
    fn capture_background(&self) -> RasterResult<Raster> {
        Err(RasterError::source("background capture is not available"))
    }
}

/// Filesystem-backed source with a search path.
///
/// Paths are expanded (`~/`, `$VAR`), tried as given and then under each search directory.
/// Background capture reads a configured image file in place of a display server.
#[derive(Clone, Debug, Default)]
pub struct FsSource {
    search_paths: Vec<PathBuf>,
    background: Option<PathBuf>,
}

impl FsSource {
    pub fn new(search_paths: Vec<PathBuf>, background: Option<PathBuf>) -> Self {
        Self {
            search_paths,
            background,
        }
    }

    pub fn from_opts(opts: &EvalOpts) -> Self {
        Self::new(opts.search_paths.clone(), opts.background.clone())
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    fn read(&self, path: &Path) -> RasterResult<Raster> {
        let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        decode_for_path(path, &bytes)
    }
}

impl RasterSource for FsSource {
    fn load(&self, src: &str) -> RasterResult<Raster> {
        let expanded = expand_path(src);
        let path = find_file(Path::new(&expanded), &self.search_paths)
            .ok_or_else(|| RasterError::source(format!("image \"{src}\" not found")))?;
        tracing::debug!(path = %path.display(), "loading image");
        self.read(&path)
    }

    fn capture_background(&self) -> RasterResult<Raster> {
        let path = self
            .background
            .as_deref()
            .ok_or_else(|| RasterError::source("no background image configured"))?;
        let path = PathBuf::from(expand_path(&path.to_string_lossy()));
        self.read(&path)
    }
}

/// In-memory source keyed by `src` value. Each load hands out a fresh copy.
#[derive(Debug, Default)]
pub struct MemorySource {
    images: BTreeMap<String, Raster>,
    background: Option<Raster>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, raster: Raster) {
        self.images.insert(name.into(), raster);
    }

    pub fn with_image(mut self, name: impl Into<String>, raster: Raster) -> Self {
        self.insert(name, raster);
        self
    }

    pub fn with_background(mut self, raster: Raster) -> Self {
        self.background = Some(raster);
        self
    }
}

fn copy_of(r: &Raster) -> RasterResult<Raster> {
    Raster::from_premul_rgba8(r.width(), r.height(), r.pixels().to_vec())
}

impl RasterSource for MemorySource {
    fn load(&self, src: &str) -> RasterResult<Raster> {
        self.images
            .get(src)
            .ok_or_else(|| RasterError::source(format!("image \"{src}\" not found")))
            .and_then(copy_of)
    }

    fn capture_background(&self) -> RasterResult<Raster> {
        self.background
            .as_ref()
            .ok_or_else(|| RasterError::source("no background image configured"))
            .and_then(copy_of)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
