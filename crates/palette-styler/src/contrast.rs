//! WCAG relative luminance and contrast helpers.

pub const WHITE: &str = "#ffffff";
pub const BLACK: &str = "#000000";

/// Minimum contrast ratio for body text (WCAG AA).
pub const MIN_TEXT_CONTRAST: f64 = 4.5;

/// Validates a hex color string (`#rgb`, `#rrggbb` or `#rrggbbaa`).
pub fn is_valid_hex(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Parses the first three channels of a hex color.
///
/// Digits missing from a short value are padded with `0` on the right, so
/// `#abc` reads as `#abc000`. Returns `None` for non-hex input.
pub fn parse_rgb(color: &str) -> Option<[u8; 3]> {
    let raw = color.trim().trim_start_matches('#');
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let mut digits: String = raw.chars().take(6).collect();
    while digits.len() < 6 {
        digits.push('0');
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

fn linearize(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn relative_luminance(color: &str) -> Option<f64> {
    let [r, g, b] = parse_rgb(color)?;
    Some(0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b))
}

pub fn contrast_ratio(a: &str, b: &str) -> Option<f64> {
    let l1 = relative_luminance(a)?;
    let l2 = relative_luminance(b)?;
    let lighter = l1.max(l2);
    let darker = l1.min(l2);
    Some((lighter + 0.05) / (darker + 0.05))
}

/// Picks a text color readable on `background`.
///
/// `preferred` is kept when it reaches [`MIN_TEXT_CONTRAST`]; otherwise the
/// better of white and black wins (white on ties). Unparseable input yields white.
pub fn readable_text(background: &str, preferred: &str) -> String {
    let Some(ratio) = contrast_ratio(background, preferred) else {
        return WHITE.to_string();
    };
    if ratio >= MIN_TEXT_CONTRAST {
        return preferred.to_string();
    }
    let on_white = contrast_ratio(background, WHITE).unwrap_or(0.0);
    let on_black = contrast_ratio(background, BLACK).unwrap_or(0.0);
    if on_white >= on_black {
        WHITE.to_string()
    } else {
        BLACK.to_string()
    }
}
