use std::ops::Range;

use crate::markup::attrs::{at_tag_end, scan_name, scan_value, skip_value_tail, skip_ws};
use crate::markup::tree::{Element, Node};

/// Nesting deeper than this is kept as literal text instead of recursing further.
const MAX_DEPTH: usize = 256;

/// Parse `src` into a root container element.
///
/// Parsing never fails. A `<` that does not start a well-formed tag, and a closing tag that does
/// not match the open element, stay in the surrounding text and scanning resumes just after the
/// bracket.
pub fn parse_document(src: &str) -> Element {
    let mut root = Element::container();
    let parser = Parser {
        src,
        bytes: src.as_bytes(),
    };
    let consumed = parser.parse_children(0, &mut root, None, 0);
    tracing::trace!(consumed, children = root.children().len(), "parsed document");
    root
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
}

struct OpenTag {
    name: Range<usize>,
    attrs: Range<usize>,
    self_closing: bool,
    end: usize,
}

impl Parser<'_> {
    /// Append the nodes found from `start` to `parent`.
    ///
    /// Stops after the closing tag named `closer`, or at end of input. Returns the number of
    /// bytes consumed.
    fn parse_children(
        &self,
        start: usize,
        parent: &mut Element,
        closer: Option<&str>,
        depth: usize,
    ) -> usize {
        let mut text_start = start;
        let mut cursor = start;

        loop {
            let Some(rel) = self.bytes[cursor..].iter().position(|b| *b == b'<') else {
                parent.push_text(&self.src[text_start..]);
                return self.bytes.len() - start;
            };
            let lt = cursor + rel;

            if self.bytes.get(lt + 1) == Some(&b'/') {
                if let Some(end) = self.closing_tag(lt, closer) {
                    parent.push_text(&self.src[text_start..lt]);
                    return end - start;
                }
                cursor = lt + 1;
                continue;
            }

            let open = if depth < MAX_DEPTH {
                self.open_tag(lt)
            } else {
                None
            };
            let Some(open) = open else {
                tracing::trace!(offset = lt, "treating '<' as text");
                cursor = lt + 1;
                continue;
            };

            parent.push_text(&self.src[text_start..lt]);

            let name = &self.src[open.name.clone()];
            let raw = self.src[open.attrs.clone()].trim_end();
            let mut child = Element::new(name, Some(raw.to_owned()));
            let mut pos = open.end;
            if !open.self_closing {
                pos += self.parse_children(pos, &mut child, Some(name), depth + 1);
            }
            parent.push(Node::Element(child));

            text_start = pos;
            cursor = pos;
        }
    }

    /// End offset of `</closer>` at `lt`, if that is what sits there.
    fn closing_tag(&self, lt: usize, closer: Option<&str>) -> Option<usize> {
        let closer = closer?;
        let name_start = lt + 2;
        let name_end = scan_name(self.bytes, name_start);
        if self.bytes.get(name_end) != Some(&b'>') {
            return None;
        }
        self.src[name_start..name_end]
            .eq_ignore_ascii_case(closer)
            .then_some(name_end + 1)
    }

    /// Scan the header of an opening tag at `lt`.
    ///
    /// Attributes are only scanned to find where the tag ends; the span is kept raw.
    fn open_tag(&self, lt: usize) -> Option<OpenTag> {
        let bytes = self.bytes;
        let name_start = lt + 1;
        let name_end = scan_name(bytes, name_start);
        if name_end == name_start || name_end >= bytes.len() {
            return None;
        }

        let attrs_start = skip_ws(bytes, name_end);
        let mut i = attrs_start;
        let attrs_end = loop {
            i = skip_ws(bytes, i);
            if at_tag_end(bytes, i) {
                break i;
            }
            if i >= bytes.len() {
                return None;
            }

            let key_start = i;
            i = scan_name(bytes, i);
            if i == key_start {
                return None;
            }
            i = skip_ws(bytes, i);
            if bytes.get(i) != Some(&b'=') {
                return None;
            }
            i = skip_ws(bytes, i + 1);

            let value = scan_value(bytes, i, true);
            i = skip_value_tail(bytes, value.next, true);
            if i >= bytes.len() {
                return None;
            }
        };

        let self_closing = bytes[attrs_end] == b'/';
        Some(OpenTag {
            name: name_start..name_end,
            attrs: attrs_start..attrs_end,
            self_closing,
            end: attrs_end + if self_closing { 2 } else { 1 },
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/markup/parser.rs"]
mod tests;
