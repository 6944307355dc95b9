use crate::effects::blend::BlendOp;
use crate::effects::composite::{Layer, canvas_size, merge_layers};
use crate::effects::gradient::GradientSpec;
use crate::effects::transform::{self, rotation_for_angle};
use crate::eval::evaluator::Evaluator;
use crate::foundation::core::Raster;
use crate::foundation::error::RasterResult;
use crate::markup::attrs::Attributes;
use crate::markup::tree::Element;

/// `src` value that asks for the screen background instead of a file.
pub const BACKGROUND_SENTINEL: &str = "xroot:";

fn soft(what: &'static str, res: RasterResult<Raster>) -> Option<Raster> {
    res.inspect_err(|e| tracing::warn!(op = what, error = %e, "operation failed"))
        .ok()
}

fn first_image(ev: &Evaluator<'_>, el: &Element, what: &'static str) -> Option<Raster> {
    let image = ev.first_child(el).into_image();
    if image.is_none() {
        tracing::warn!(op = what, "no child image");
    }
    image
}

pub(crate) fn img(ev: &Evaluator<'_>, attrs: &Attributes) -> Option<Raster> {
    let Some(src) = attrs.get("src") else {
        tracing::warn!("img without src");
        return None;
    };
    if src == BACKGROUND_SENTINEL {
        return soft("background", ev.source().capture_background());
    }
    let out = soft("img", ev.source().load(src))?;
    tracing::debug!(src, width = out.width(), height = out.height(), "image loaded");
    Some(out)
}

pub(crate) fn gradient(ev: &Evaluator<'_>, attrs: &Attributes) -> Option<Raster> {
    let (width, height) = ev.opts().size_from(attrs)?;
    let colors = attrs.get("colors")?;
    let angle = attrs.float("angle").unwrap_or(0.0);

    let Some(spec) = GradientSpec::new(angle, colors, attrs.get("offsets")) else {
        tracing::warn!(colors, "gradient needs at least two stops");
        return None;
    };
    tracing::debug!(
        angle,
        direction = ?spec.direction,
        reverse = spec.reverse,
        stops = spec.stops.len(),
        "gradient"
    );
    soft("gradient", spec.render(width, height))
}

pub(crate) fn mirror(ev: &Evaluator<'_>, el: &Element, attrs: &Attributes) -> Option<Raster> {
    let vertical = attrs
        .get("dir")
        .is_some_and(|d| d.eq_ignore_ascii_case("vertical"));
    let child = first_image(ev, el, "mirror")?;
    soft("mirror", transform::mirror(child, vertical))
}

pub(crate) fn rotate(ev: &Evaluator<'_>, el: &Element, attrs: &Attributes) -> Option<Raster> {
    let rotation = rotation_for_angle(attrs.float("angle").unwrap_or(0.0));
    let child = first_image(ev, el, "rotate")?;
    tracing::debug!(?rotation, "rotate");
    soft("rotate", transform::rotate(child, rotation))
}

pub(crate) fn scale(ev: &Evaluator<'_>, el: &Element, attrs: &Attributes) -> Option<Raster> {
    let (width, height) = ev.opts().size_from(attrs)?;
    let child = first_image(ev, el, "scale")?;
    soft("scale", transform::scale(child, width, height))
}

pub(crate) fn tile(ev: &Evaluator<'_>, el: &Element, attrs: &Attributes) -> Option<Raster> {
    let (width, height) = ev.opts().size_from(attrs)?;
    let child = first_image(ev, el, "tile")?;
    soft("tile", transform::tile(child, width, height))
}

/// Stack every child image in document order. Each child's own `x`/`y` place its layer.
pub(crate) fn composite(ev: &Evaluator<'_>, el: &Element, attrs: &Attributes) -> Option<Raster> {
    let Some(op) = attrs.get("op") else {
        tracing::warn!("composite without op");
        return None;
    };
    let op = BlendOp::resolve(op);

    let layers: Vec<Layer> = el
        .elements()
        .filter_map(|child| {
            // Offsets come from this child alone; a child without `x`/`y` sits at the origin.
            let result = ev.evaluate(child);
            let (x, y) = (result.offset("x"), result.offset("y"));
            result.into_image().map(|image| Layer::new(image, x, y))
        })
        .collect();

    let (width, height) = canvas_size(&layers)?;
    tracing::debug!(%op, layers = layers.len(), width, height, "composite");
    soft("composite", merge_layers(layers, op, width, height))
}

#[cfg(test)]
#[path = "../../tests/unit/eval/handlers.rs"]
mod tests;
