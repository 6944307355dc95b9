use crate::assets::source::RasterSource;
use crate::eval::handlers;
use crate::eval::opts::EvalOpts;
use crate::foundation::core::{Raster, RasterLedger};
use crate::markup::attrs::Attributes;
use crate::markup::tree::{Element, Tag};

/// Result of evaluating one element.
///
/// `attrs` is the attribute list of the element that actually produced `image`, so a parent can
/// read placement hints (`x`, `y`) from whichever descendant answered.
#[derive(Debug, Default)]
pub struct Evaluated {
    pub image: Option<Raster>,
    pub attrs: Option<Attributes>,
}

impl Evaluated {
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    pub fn into_image(self) -> Option<Raster> {
        self.image
    }

    /// Integer attribute of the producing element, `0` when absent.
    pub fn offset(&self, key: &str) -> i64 {
        self.attrs.as_ref().and_then(|a| a.int(key)).unwrap_or(0)
    }
}

/// Walks a parsed document and produces its image.
pub struct Evaluator<'a> {
    source: &'a dyn RasterSource,
    opts: EvalOpts,
    ledger: Option<RasterLedger>,
}

impl<'a> Evaluator<'a> {
    pub fn new(source: &'a dyn RasterSource, opts: EvalOpts) -> Self {
        Self {
            source,
            opts,
            ledger: None,
        }
    }

    /// Record every raster produced by an element on `ledger`.
    pub fn with_ledger(mut self, ledger: RasterLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn opts(&self) -> &EvalOpts {
        &self.opts
    }

    pub(crate) fn source(&self) -> &dyn RasterSource {
        self.source
    }

    /// Image for the whole document, owned by the caller.
    pub fn render(&self, root: &Element) -> Option<Raster> {
        let out = self.evaluate(root).into_image();
        match &out {
            Some(r) => tracing::info!(width = r.width(), height = r.height(), "rendered"),
            None => tracing::info!("document produced no image"),
        }
        out
    }

    /// Evaluate one element.
    ///
    /// Built-in tags run their handler. When the tag is not built in, or its handler yields
    /// nothing, the children are tried in document order and the first image wins.
    #[tracing::instrument(level = "debug", skip(self, el), fields(tag = el.name()))]
    pub fn evaluate(&self, el: &Element) -> Evaluated {
        if el.tag().is_builtin() {
            let attrs = el.attributes().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring malformed attributes");
                Attributes::default()
            });
            let image = match el.tag() {
                Tag::Img => handlers::img(self, &attrs),
                Tag::Gradient => handlers::gradient(self, &attrs),
                Tag::Mirror => handlers::mirror(self, el, &attrs),
                Tag::Rotate => handlers::rotate(self, el, &attrs),
                Tag::Scale => handlers::scale(self, el, &attrs),
                Tag::Tile => handlers::tile(self, el, &attrs),
                Tag::Composite => handlers::composite(self, el, &attrs),
                Tag::Container | Tag::Other => None,
            };
            if let Some(image) = image {
                return Evaluated {
                    image: Some(self.track(image)),
                    attrs: Some(attrs),
                };
            }
            tracing::debug!("no image from handler, trying children");
        }
        self.first_child(el)
    }

    /// First non-empty child result, passed through unchanged.
    pub(crate) fn first_child(&self, el: &Element) -> Evaluated {
        el.elements()
            .map(|child| self.evaluate(child))
            .find(|r| !r.is_empty())
            .unwrap_or_default()
    }

    fn track(&self, raster: Raster) -> Raster {
        match &self.ledger {
            Some(ledger) => ledger.track(raster),
            None => raster,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
