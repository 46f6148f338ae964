/// Text colour that stays readable on top of a label's background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            TextColor::Black => (0, 0, 0),
            TextColor::White => (255, 255, 255),
        }
    }
}

/// Decode GitHub's `rrggbb` label colour. A leading `#` is tolerated.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Perceived brightness in `0.0..=1.0`
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0
}

/// Black on bright backgrounds, white on dark ones
///
/// Colours that don't decode get black text.
pub fn label_text_color(hex: &str) -> TextColor {
    match parse_hex_color(hex) {
        Some((r, g, b)) if luminance(r, g, b) > 0.5 => TextColor::Black,
        Some(_) => TextColor::White,
        None => TextColor::Black,
    }
}
