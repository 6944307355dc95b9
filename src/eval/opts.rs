use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::MAX_DIMENSION;
use crate::foundation::error::{RasterError, RasterResult};
use crate::markup::attrs::Attributes;

/// Evaluation settings shared by every node of one render.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvalOpts {
    /// Directories tried, in order, for relative image paths.
    pub search_paths: Vec<PathBuf>,
    /// Image file standing in for the captured screen background.
    pub background: Option<PathBuf>,
    /// Largest width or height a handler may produce.
    pub max_dimension: u32,
}

impl Default for EvalOpts {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            background: None,
            max_dimension: MAX_DIMENSION,
        }
    }
}

impl EvalOpts {
    pub fn from_json(text: &str) -> RasterResult<Self> {
        let opts: Self = serde_json::from_str(text)
            .map_err(|e| RasterError::validation(format!("invalid options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_path(path: &Path) -> RasterResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> RasterResult<()> {
        if self.max_dimension == 0 || self.max_dimension > MAX_DIMENSION {
            return Err(RasterError::validation(format!(
                "max_dimension must be in 1..={MAX_DIMENSION}, got {}",
                self.max_dimension
            )));
        }
        Ok(())
    }

    /// Read `width` and `height` from `attrs`, accepting only `1..=max_dimension`.
    pub(crate) fn size_from(&self, attrs: &Attributes) -> Option<(u32, u32)> {
        let dim = |key: &str| {
            let v = attrs.int(key)?;
            match u32::try_from(v) {
                Ok(v) if (1..=self.max_dimension).contains(&v) => Some(v),
                _ => {
                    tracing::warn!(
                        key,
                        value = v,
                        max = self.max_dimension,
                        "dimension out of range"
                    );
                    None
                }
            }
        };
        Some((dim("width")?, dim("height")?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/opts.rs"]
mod tests;
