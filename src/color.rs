/// 24-bit colour as used by the ANSI truecolor escapes.
pub type Rgb = (u8, u8, u8);

pub const WHITE: Rgb = (255, 255, 255);

/// Parses `RRGGBB` or `#RRGGBB`.
pub fn parse_hex(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// HSL to RGB. `hue` in degrees, `saturation` and `lightness` in 0..=1.
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

/// Linear blend from `from` towards `to`; `t` is clamped to 0..=1.
pub fn mix(from: Rgb, to: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    (
        (from.0 as f32 * (1.0 - t) + to.0 as f32 * t) as u8,
        (from.1 as f32 * (1.0 - t) + to.1 as f32 * t) as u8,
        (from.2 as f32 * (1.0 - t) + to.2 as f32 * t) as u8,
    )
}
