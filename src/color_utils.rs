//! Color utility functions shared across the application.
//!
//! Tag colors come from a configurable palette; once the palette is exhausted
//! (or when it is empty) colors are generated by stepping the hue by the
//! golden angle, which keeps neighbouring tags visually distinct.

/// Default tag palette, cycled in order as new tags are discovered.
pub const DEFAULT_TAG_PALETTE: &[&str] = &[
    "#808000", "#008080", "#800080", "#ff8c00", "#1e90ff", "#dc143c", "#32cd32", "#ffd700",
    "#8a2be2", "#00ced1", "#ff1493", "#a0522d",
];

/// Golden angle in degrees, for good hue distribution.
const GOLDEN_ANGLE: f32 = 137.5;

/// Convert HSV to RGB.
///
/// # Arguments
/// * `h` - Hue in degrees (0-360)
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value/brightness (0.0-1.0)
///
/// # Returns
/// RGB tuple with values in range 0.0-1.0
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Deterministic generated color for the `index`-th tag.
pub fn generated_color(index: usize) -> [u8; 3] {
    let hue = (index as f32 * GOLDEN_ANGLE) % 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.9);
    [to_byte(r), to_byte(g), to_byte(b)]
}

/// Color for the `index`-th tag: the palette entry (cycling) when the palette
/// has valid entries, a generated color otherwise.
pub fn palette_color(palette: &[[u8; 3]], index: usize) -> [u8; 3] {
    if palette.is_empty() {
        generated_color(index)
    } else {
        palette[index % palette.len()]
    }
}

/// Parse a `#rrggbb` (or `rrggbb`) color.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Format a color as lowercase `#rrggbb`.
pub fn to_hex(color: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

/// Parse a palette, skipping (and logging) malformed entries.
pub fn parse_palette<S: AsRef<str>>(entries: &[S]) -> Vec<[u8; 3]> {
    entries
        .iter()
        .filter_map(|entry| {
            let parsed = parse_hex(entry.as_ref());
            if parsed.is_none() {
                log::warn!("Ignoring invalid palette color {:?}", entry.as_ref());
            }
            parsed
        })
        .collect()
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
