use std::cell::Cell;

use crate::assets::source::{MemorySource, RasterSource};
use crate::eval::opts::EvalOpts;
use crate::foundation::core::{RasterLedger, Rgba8Premul};
use crate::markup::parser::parse_document;

use super::*;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Raster {
    let color = Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3]);
    Raster::filled(w, h, color).unwrap()
}

/// 2x3 raster numbered row-major in the red channel.
fn numbered() -> Raster {
    let data = (0..6u8).flat_map(|i| [i, 0, 0, 255]).collect();
    Raster::from_premul_rgba8(2, 3, data).unwrap()
}

fn reds(r: &Raster) -> Vec<u8> {
    r.pixels().chunks_exact(4).map(|px| px[0]).collect()
}

/// Memory source that remembers the buffer address of the last image it handed out.
struct Recording {
    inner: MemorySource,
    last: Cell<usize>,
}

impl RasterSource for Recording {
    fn load(&self, src: &str) -> RasterResult<Raster> {
        let r = self.inner.load(src)?;
        self.last.set(r.pixels().as_ptr() as usize);
        Ok(r)
    }
}

fn source() -> MemorySource {
    MemorySource::new()
        .with_image("n", numbered())
        .with_image("red10", solid(10, 10, [255, 0, 0, 255]))
        .with_image("green20x5", solid(20, 5, [0, 255, 0, 255]))
        .with_image("blue5x20", solid(5, 20, [0, 0, 255, 255]))
        .with_background(solid(4, 4, [1, 2, 3, 255]))
}

/// Render `doc`, check that exactly the returned image is still alive, then that nothing is.
fn render_checked(src: &dyn RasterSource, doc: &str) -> (Raster, usize) {
    let ledger = RasterLedger::new();
    let ev = Evaluator::new(src, EvalOpts::default()).with_ledger(ledger.clone());
    let out = ev.render(&parse_document(doc)).unwrap();
    assert_eq!(ledger.live(), 1, "only the result may be alive: {doc}");
    let created = ledger.stats().created;

    let (w, h) = out.dimensions();
    let copy = Raster::from_premul_rgba8(w, h, out.pixels().to_vec()).unwrap();
    drop(out);
    assert_eq!(ledger.live(), 0, "result must be the last live raster: {doc}");
    (copy, created)
}

#[test]
fn img_loads_from_the_source() {
    let (out, created) = render_checked(&source(), r#"<img src="n"/>"#);
    assert_eq!(reds(&out), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(created, 1);
}

#[test]
fn img_sentinel_captures_the_background() {
    let (out, _) = render_checked(&source(), r#"<img src="xroot:"/>"#);
    assert_eq!(out.dimensions(), (4, 4));
    assert_eq!(out.pixel(0, 0).unwrap().to_array(), [1, 2, 3, 255]);
}

#[test]
fn img_without_src_or_file_yields_nothing() {
    let src = source();
    let ev = Evaluator::new(&src, EvalOpts::default());
    assert!(ev.render(&parse_document("<img/>")).is_none());
    assert!(ev.render(&parse_document(r#"<img src="gone"/>"#)).is_none());
    let bare = MemorySource::new();
    let ev = Evaluator::new(&bare, EvalOpts::default());
    assert!(ev.render(&parse_document(r#"<img src="xroot:"/>"#)).is_none());
}

#[test]
fn gradient_renders_requested_size() {
    let (out, created) = render_checked(
        &source(),
        r##"<gradient width=5 height=3 angle=3.14159265 colors="#ff0000 #0000ff"/>"##,
    );
    assert_eq!(out.dimensions(), (5, 3));
    assert_eq!(out.pixel(0, 1).unwrap().to_array(), [0, 0, 255, 255]);
    assert_eq!(out.pixel(4, 1).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(created, 1);
}

#[test]
fn gradient_requires_size_and_two_colors() {
    let src = source();
    let ev = Evaluator::new(&src, EvalOpts::default());
    for doc in [
        r##"<gradient height=3 colors="#ff0000 #0000ff"/>"##,
        r##"<gradient width=3 height=3 colors="#ff0000"/>"##,
        r#"<gradient width=3 height=3/>"#,
    ] {
        assert!(ev.render(&parse_document(doc)).is_none(), "{doc}");
    }
}

#[test]
fn sizes_above_the_configured_limit_are_refused() {
    let src = source();
    let opts = EvalOpts {
        max_dimension: 8,
        ..EvalOpts::default()
    };
    let ev = Evaluator::new(&src, opts);
    let doc = parse_document(r##"<gradient width=9 height=2 colors="red blue"/>"##);
    assert!(ev.render(&doc).is_none());
}

#[test]
fn mirror_direction_attribute() {
    let (lr, created) = render_checked(&source(), r#"<mirror><img src="n"/></mirror>"#);
    assert_eq!(reds(&lr), vec![1, 0, 3, 2, 5, 4]);
    assert_eq!(created, 2);

    let (tb, _) = render_checked(&source(), r#"<mirror dir=VERTICAL><img src="n"/></mirror>"#);
    assert_eq!(reds(&tb), vec![4, 5, 2, 3, 0, 1]);
}

#[test]
fn rotate_identity_returns_the_child_instance() {
    let src = Recording {
        inner: source(),
        last: Cell::new(0),
    };
    let ledger = RasterLedger::new();
    let ev = Evaluator::new(&src, EvalOpts::default()).with_ledger(ledger.clone());
    let out = ev
        .render(&parse_document(r#"<rotate angle=0><img src="n"/></rotate>"#))
        .unwrap();
    assert_eq!(out.pixels().as_ptr() as usize, src.last.get());
    assert_eq!(ledger.stats().created, 1);
}

#[test]
fn rotate_quarter_turn_swaps_dimensions() {
    let (out, created) =
        render_checked(&source(), r#"<rotate angle=1.5708><img src="n"/></rotate>"#);
    assert_eq!(out.dimensions(), (3, 2));
    assert_eq!(reds(&out), vec![4, 2, 0, 5, 3, 1]);
    assert_eq!(created, 2);

    let (out, _) = render_checked(
        &source(),
        r#"<rotate angle=-3.14159265><img src="n"/></rotate>"#,
    );
    assert_eq!(reds(&out), vec![5, 4, 3, 2, 1, 0]);
}

#[test]
fn scale_and_tile_hit_exact_sizes() {
    let (scaled, created) =
        render_checked(&source(), r#"<scale width=7 height="011"><img src="red10"/></scale>"#);
    assert_eq!(scaled.dimensions(), (7, 9));
    assert_eq!(created, 2);

    let (tiled, created) =
        render_checked(&source(), r#"<tile width=5 height=4><img src="n"/></tile>"#);
    assert_eq!(tiled.dimensions(), (5, 4));
    assert_eq!(reds(&tiled)[..5], [0, 1, 0, 1, 0]);
    assert_eq!(reds(&tiled)[15..], [0, 1, 0, 1, 0]);
    assert_eq!(created, 2);
}

#[test]
fn transforms_without_a_child_yield_nothing() {
    let src = source();
    let ev = Evaluator::new(&src, EvalOpts::default());
    for doc in [
        "<mirror/>",
        "<rotate angle=1.5708/>",
        "<scale width=2 height=2/>",
        "<tile width=2 height=2>text only</tile>",
    ] {
        assert!(ev.render(&parse_document(doc)).is_none(), "{doc}");
    }
}

#[test]
fn composite_canvas_is_max_of_layers_in_document_order() {
    let (out, created) = render_checked(
        &source(),
        r#"<composite op=alphablend>
             <img src="red10"/>
             some text
             <img src="green20x5"/>
             <img src="blue5x20"/>
           </composite>"#,
    );
    assert_eq!(out.dimensions(), (20, 20));
    assert_eq!(out.pixel(0, 0).unwrap().to_array(), [0, 0, 255, 255]);
    assert_eq!(out.pixel(7, 2).unwrap().to_array(), [0, 255, 0, 255]);
    assert_eq!(out.pixel(7, 7).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(out.pixel(19, 19).unwrap().to_array(), [0, 0, 0, 0]);
    assert_eq!(created, 4);
}

#[test]
fn composite_offsets_come_from_each_child() {
    let (out, _) = render_checked(
        &source(),
        r#"<composite op=alphablend>
             <img src="red10"/>
             <img src="n" x=8 y=7/>
             <img src="n"/>
           </composite>"#,
    );
    // Offset layer lands at (8, 7); the next layer starts at the origin again.
    assert_eq!(out.pixel(8, 7).unwrap().to_array(), [0, 0, 0, 255]);
    assert_eq!(out.pixel(9, 9).unwrap().to_array(), [5, 0, 0, 255]);
    assert_eq!(out.pixel(1, 2).unwrap().to_array(), [5, 0, 0, 255]);
    assert_eq!(out.pixel(5, 5).unwrap().to_array(), [255, 0, 0, 255]);
}

#[test]
fn composite_offsets_follow_passed_through_children() {
    let (out, _) = render_checked(
        &source(),
        r#"<composite op=alphablend>
             <img src="red10"/>
             <wrap><img src="n" x=1/></wrap>
           </composite>"#,
    );
    assert_eq!(out.pixel(0, 0).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(out.pixel(2, 0).unwrap().to_array(), [1, 0, 0, 255]);
}

#[test]
fn composite_offsets_beyond_the_integer_range_leave_the_canvas_alone() {
    let (out, created) = render_checked(
        &source(),
        r#"<composite op=alphablend>
             <img src="red10"/>
             <img src="n" x=99999999999999999999 y="-99999999999999999999"/>
             <img src="n" y=99999999999999999999/>
           </composite>"#,
    );
    assert_eq!(out.dimensions(), (10, 10));
    assert!(
        out.pixels()
            .chunks_exact(4)
            .all(|px| px == [255, 0, 0, 255])
    );
    assert_eq!(created, 4);
}

#[test]
fn composite_needs_op_and_layers() {
    let src = source();
    let ev = Evaluator::new(&src, EvalOpts::default());
    assert!(
        ev.render(&parse_document("<composite op=add>text</composite>"))
            .is_none()
    );
    // Without op the composite fails and its first child answers.
    let out = ev
        .render(&parse_document(
            r#"<composite><img src="n"/><img src="red10"/></composite>"#,
        ))
        .unwrap();
    assert_eq!(out.dimensions(), (2, 3));
}

#[test]
fn composite_unknown_op_blends_normally() {
    let (out, _) = render_checked(
        &source(),
        r#"<composite op=sparkle><img src="red10"/><img src="green20x5"/></composite>"#,
    );
    assert_eq!(out.pixel(0, 0).unwrap().to_array(), [0, 255, 0, 255]);
}
