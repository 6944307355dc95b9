//! Lenient numeric parsing for attribute values.
//!
//! Attribute values are free text, so numbers are read from the longest valid prefix and
//! trailing junk is ignored (`"64px"` reads as `64`).

/// Parse an integer prefix with C `strtol(s, NULL, 0)` base rules.
///
/// Leading whitespace and one sign are accepted; `0x`/`0X` selects hex, a leading `0` selects
/// octal, anything else is decimal. Returns `0` when no digits are present; saturates on
/// overflow.
pub fn int_prefix(s: &str) -> i64 {
    let bytes = s.trim_start().as_bytes();
    let mut i = 0usize;

    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let radix = if bytes.get(i) == Some(&b'0')
        && matches!(bytes.get(i + 1), Some(b'x' | b'X'))
        && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
    {
        i += 2;
        16
    } else if bytes.get(i) == Some(&b'0') {
        8
    } else {
        10
    };

    let mut value: i64 = 0;
    while let Some(d) = bytes.get(i).and_then(|b| (*b as char).to_digit(radix)) {
        value = value
            .saturating_mul(i64::from(radix))
            .saturating_add(i64::from(d));
        i += 1;
    }

    if negative { -value } else { value }
}

/// Parse the longest decimal floating-point prefix of `s`.
///
/// Returns the value and the number of bytes consumed (including leading whitespace), or
/// `None` if `s` does not start with a number.
pub fn float_prefix(s: &str) -> Option<(f64, usize)> {
    let lead = s.len() - s.trim_start().len();
    let bytes = s.as_bytes();
    let mut i = lead;

    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;

    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            i = j;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let v: f64 = s[lead..i].parse().ok()?;
    Some((v, i))
}

/// Float prefix of `s`, or `0.0` when there is none.
pub fn float_or_zero(s: &str) -> f64 {
    float_prefix(s).map_or(0.0, |(v, _)| v)
}

/// Parse `s` as a float only if the whole token is numeric.
pub fn float_exact(s: &str) -> Option<f64> {
    match float_prefix(s) {
        Some((v, used)) if used == s.len() => Some(v),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/numeric.rs"]
mod tests;
