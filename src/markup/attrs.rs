use std::fmt;

use smallvec::SmallVec;

use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::numeric::{float_or_zero, int_prefix};

/// One parsed `key=value` pair. Keys are lower-cased, values are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    pub key: String,
    pub value: String,
}

/// Attribute list in appearance order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: SmallVec<[Attr; 4]>,
}

impl Attributes {
    /// Parse a raw attribute string such as `src="a.png" width=10`.
    ///
    /// Any key that is not followed by `=` makes the whole string malformed; no partial list is
    /// returned in that case.
    pub fn parse(raw: &str) -> RasterResult<Self> {
        let bytes = raw.as_bytes();
        let mut entries = SmallVec::new();
        let mut i = 0usize;

        loop {
            i = skip_ws(bytes, i);
            if i >= bytes.len() {
                break;
            }

            let key_start = i;
            i = scan_name(bytes, i);
            if i == key_start {
                return Err(RasterError::attribute(format!(
                    "expected attribute name at byte {key_start} in \"{raw}\""
                )));
            }
            let key = raw[key_start..i].to_ascii_lowercase();

            i = skip_ws(bytes, i);
            if bytes.get(i) != Some(&b'=') {
                return Err(RasterError::attribute(format!(
                    "attribute \"{key}\" has no value"
                )));
            }
            i = skip_ws(bytes, i + 1);

            let value = scan_value(bytes, i, false);
            entries.push(Attr {
                key,
                value: raw[value.start..value.end].to_owned(),
            });
            i = skip_value_tail(bytes, value.next, false);
        }

        Ok(Self { entries })
    }

    /// Parse an optional raw span; `None` parses as an empty list.
    pub fn parse_opt(raw: Option<&str>) -> RasterResult<Self> {
        raw.map_or_else(|| Ok(Self::default()), Self::parse)
    }

    /// First value for `key` in appearance order.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.key.eq_ignore_ascii_case(key))
            .map(|a| a.value.as_str())
    }

    /// Integer value for `key`, read with `strtol` base rules.
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).map(int_prefix)
    }

    /// Float value for `key`; unparsable text reads as `0.0`.
    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).map(float_or_zero)
    }

    /// Pairs in appearance order, duplicate keys included.
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.entries.iter()
    }

    /// Number of pairs, duplicate keys included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, a) in self.entries.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            // No escapes exist, so quote with whichever delimiter the value lacks.
            if a.value.contains('"') {
                write!(f, "{}='{}'", a.key, a.value)?;
            } else {
                write!(f, "{}=\"{}\"", a.key, a.value)?;
            }
        }
        Ok(())
    }
}

/// Byte span of a scanned value plus the position just past it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ValueSpan {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) next: usize,
}

pub(crate) fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

pub(crate) fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    i
}

pub(crate) fn scan_name(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(|b| is_name_byte(*b)) {
        i += 1;
    }
    i
}

/// `>` or `/>` at `i`.
pub(crate) fn at_tag_end(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i) {
        Some(b'>') => true,
        Some(b'/') => bytes.get(i + 1) == Some(&b'>'),
        _ => false,
    }
}

/// Scan a quoted or bare value starting at `i`.
///
/// Inside a tag header a bare value also stops at `>` or `/>`.
pub(crate) fn scan_value(bytes: &[u8], i: usize, in_tag: bool) -> ValueSpan {
    match bytes.get(i) {
        Some(&q @ (b'"' | b'\'')) => {
            let start = i + 1;
            let end = bytes[start..]
                .iter()
                .position(|b| *b == q)
                .map_or(bytes.len(), |p| start + p);
            ValueSpan {
                start,
                end,
                next: (end + 1).min(bytes.len()),
            }
        }
        _ => {
            let mut end = i;
            while end < bytes.len()
                && !bytes[end].is_ascii_whitespace()
                && !(in_tag && at_tag_end(bytes, end))
            {
                end += 1;
            }
            ValueSpan {
                start: i,
                end,
                next: end,
            }
        }
    }
}

/// Skip whatever trails a value up to the next separator.
pub(crate) fn skip_value_tail(bytes: &[u8], mut i: usize, in_tag: bool) -> usize {
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && !(in_tag && at_tag_end(bytes, i)) {
        i += 1;
    }
    i
}

#[cfg(test)]
#[path = "../../tests/unit/markup/attrs.rs"]
mod tests;
