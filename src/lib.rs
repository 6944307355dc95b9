#![forbid(unsafe_code)]

//! Compose one raster image from a small tag-based markup document.
//!
//! ```text
//! <composite op="hue">
//!   <gradient width=320 height=240 colors="red blue"/>
//!   <img src="rose.png" x=10 y=10/>
//! </composite>
//! ```
//!
//! [`parse_document`] turns text into an [`Element`] tree without ever failing; an [`Evaluator`]
//! then walks the tree, loading images through a [`RasterSource`] and returning the root's
//! [`Raster`]. Rasters are move-only; a [`RasterLedger`] can be attached to count creations and
//! releases.

mod assets;
mod effects;
mod eval;
mod foundation;
mod markup;

pub use assets::color::parse_color;
pub use assets::decode::{decode_image, decode_svg};
pub use assets::path::{expand_path, find_file};
pub use assets::source::{FsSource, MemorySource, RasterSource};
pub use effects::blend::{BlendFn, BlendOp};
pub use effects::composite::{ClipRect, Layer, canvas_size, merge_layers};
pub use effects::gradient::{GradientDirection, GradientSpec, Stop, bucket_angle};
pub use effects::transform::{Rotation, mirror, rotate, rotation_for_angle, scale, tile};
pub use eval::evaluator::{Evaluated, Evaluator};
pub use eval::handlers::BACKGROUND_SENTINEL;
pub use eval::opts::EvalOpts;
pub use foundation::core::{LedgerStats, MAX_DIMENSION, Raster, RasterLedger, Rgba8Premul};
pub use foundation::error::{RasterError, RasterResult};
pub use markup::attrs::{Attr, Attributes};
pub use markup::parser::parse_document;
pub use markup::tree::{Element, Node, Tag};
