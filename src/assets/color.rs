use crate::foundation::core::Rgba8Premul;

const NAMED: [(&str, [u8; 4]); 13] = [
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
    ("gray", [190, 190, 190, 255]),
    ("grey", [190, 190, 190, 255]),
    ("orange", [255, 165, 0, 255]),
    ("purple", [160, 32, 240, 255]),
    ("transparent", [0, 0, 0, 0]),
];

/// Parse a gradient color token.
///
/// Accepts `#RGB`, `#RRGGBB`, `#AARRGGBB` (alpha first) and a few color names, all
/// case-insensitive. Returns `None` for anything else.
pub fn parse_color(token: &str) -> Option<Rgba8Premul> {
    let token = token.trim();
    match token.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, [r, g, b, a])| Rgba8Premul::from_straight_rgba(*r, *g, *b, *a)),
    }
}

fn parse_hex(s: &str) -> Option<Rgba8Premul> {
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    fn byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    let (a, r, g, b) = match s.len() {
        3 => {
            // #RGB widens each nibble: f -> ff.
            let n = |i: usize| byte(&s[i..=i]).map(|v| v * 17);
            (255, n(0)?, n(1)?, n(2)?)
        }
        6 => (255, byte(&s[0..2])?, byte(&s[2..4])?, byte(&s[4..6])?),
        8 => (
            byte(&s[0..2])?,
            byte(&s[2..4])?,
            byte(&s[4..6])?,
            byte(&s[6..8])?,
        ),
        _ => return None,
    };

    Some(Rgba8Premul::from_straight_rgba(r, g, b, a))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
