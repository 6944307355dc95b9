use super::*;

#[test]
fn parses_rgb_hex_forms() {
    assert_eq!(
        parse_color("#ff0000"),
        Some(Rgba8Premul::from_straight_rgba(255, 0, 0, 255))
    );
    assert_eq!(
        parse_color("#0F0"),
        Some(Rgba8Premul::from_straight_rgba(0, 255, 0, 255))
    );
}

#[test]
fn eight_digit_hex_puts_alpha_first() {
    let c = parse_color("#800000ff").unwrap();
    assert_eq!(c.a, 128);
    assert_eq!(c.b, ((255u16 * 128 + 127) / 255) as u8);
    assert_eq!(c.r, 0);
}

#[test]
fn parses_named_colors_case_insensitively() {
    assert_eq!(parse_color("White"), parse_color("#ffffff"));
    assert_eq!(parse_color("transparent"), Some(Rgba8Premul::transparent()));
}

#[test]
fn rejects_garbage() {
    assert_eq!(parse_color("#12345"), None);
    assert_eq!(parse_color("#gg0000"), None);
    assert_eq!(parse_color("#+f+f+f"), None);
    assert_eq!(parse_color("chartreuse-ish"), None);
    assert_eq!(parse_color(""), None);
}
