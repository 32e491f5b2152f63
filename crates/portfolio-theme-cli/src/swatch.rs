//! Terminal color swatches for token values.

use console::Style;

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
///
/// ```rust
/// use portfolio_theme_cli::rgb_to_ansi256;
///
/// assert_eq!(rgb_to_ansi256((255, 0, 0)), 196);
/// assert_eq!(rgb_to_ansi256((0, 255, 0)), 46);
/// ```
pub fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`, ignoring alpha.
pub fn parse_hex(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 | 4 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((digits.next()??, digits.next()??, digits.next()??))
        }
        6 | 8 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        _ => None,
    }
}

/// Finds the first hex color in a value, e.g. the first stop of a gradient.
pub fn first_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let start = value.find('#')?;
    let rest = &value[start..];
    let end = rest[1..]
        .find(|c: char| !c.is_ascii_hexdigit())
        .map(|i| i + 1)
        .unwrap_or(rest.len());
    parse_hex(&rest[..end])
}

/// Renders a two-cell swatch for a token value, or blanks if it has no color.
pub fn swatch(value: &str) -> String {
    match first_hex_color(value) {
        Some(rgb) => Style::new()
            .color256(rgb_to_ansi256(rgb))
            .apply_to("██")
            .to_string(),
        None => "  ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_ansi256_grayscale() {
        assert_eq!(rgb_to_ansi256((0, 0, 0)), 16);
        assert_eq!(rgb_to_ansi256((255, 255, 255)), 231);
        let mid = rgb_to_ansi256((128, 128, 128));
        assert!((232..=255).contains(&mid));
    }

    #[test]
    fn test_rgb_to_ansi256_color_cube() {
        assert_eq!(rgb_to_ansi256((0, 0, 255)), 21);
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_hex("#2563eb"), Some((0x25, 0x63, 0xeb)));
        assert_eq!(parse_hex("#2563ebcc"), Some((0x25, 0x63, 0xeb)));
        assert_eq!(parse_hex("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex("#0f08"), Some((0, 255, 0)));
        assert_eq!(parse_hex("2563eb"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#gggggg"), None);
    }

    #[test]
    fn test_first_hex_color_in_gradient() {
        assert_eq!(
            first_hex_color("linear-gradient(135deg, #1e40af 0%, #7c3aed 50%)"),
            Some((0x1e, 0x40, 0xaf))
        );
        assert_eq!(first_hex_color("none"), None);
    }

    #[test]
    fn test_swatch_without_color_is_blank() {
        assert_eq!(swatch("transparent"), "  ");
        assert!(swatch("#000000").contains("██"));
    }
}
