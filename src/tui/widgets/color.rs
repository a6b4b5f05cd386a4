use ratatui::style::Color;

/// Parse a theme or calendar color into a ratatui Color.
///
/// Accepts terminal color names ("blue", "darkgray", "lightcyan"...),
/// `#RRGGBB` / `#RGB` hex and `rgb(r, g, b)`. Anything else is white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).unwrap_or(Color::White);
    }
    if let Some(body) = s.strip_prefix("rgb(").and_then(|rest| rest.strip_suffix(')')) {
        return parse_rgb(body).unwrap_or(Color::White);
    }

    match s.replace("grey", "gray").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "lightgray" => Color::Gray,
        "darkgray" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "reset" => Color::Reset,
        _ => Color::White,
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            // #abc is #aabbcc
            let widen = |s: &str| channel(s).map(|v| (v << 4) | v);
            Some(Color::Rgb(widen(&hex[0..1])?, widen(&hex[1..2])?, widen(&hex[2..3])?))
        }
        _ => None,
    }
}

fn parse_rgb(body: &str) -> Option<Color> {
    let mut parts = body.split(',').map(|p| p.trim().parse::<u8>());
    let color = Color::Rgb(parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
    parts.next().is_none().then_some(color)
}

/// Approximate sRGB channels, 0.0..=1.0
fn rgb_channels(color: Color) -> (f64, f64, f64) {
    match color {
        Color::Rgb(r, g, b) => (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0),
        Color::Black => (0.0, 0.0, 0.0),
        Color::Red => (0.8, 0.0, 0.0),
        Color::Green => (0.0, 0.8, 0.0),
        Color::Yellow => (0.8, 0.8, 0.0),
        Color::Blue => (0.0, 0.0, 0.8),
        Color::Magenta => (0.8, 0.0, 0.8),
        Color::Cyan => (0.0, 0.8, 0.8),
        Color::Gray => (0.75, 0.75, 0.75),
        Color::DarkGray => (0.4, 0.4, 0.4),
        Color::LightRed => (1.0, 0.4, 0.4),
        Color::LightGreen => (0.4, 1.0, 0.4),
        Color::LightYellow => (1.0, 1.0, 0.4),
        Color::LightBlue => (0.4, 0.4, 1.0),
        Color::LightMagenta => (1.0, 0.4, 1.0),
        Color::LightCyan => (0.4, 1.0, 1.0),
        Color::White => (1.0, 1.0, 1.0),
        Color::Indexed(_) | Color::Reset => (0.5, 0.5, 0.5),
    }
}

/// WCAG relative luminance
fn luminance(color: Color) -> f64 {
    let linear = |c: f64| {
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    let (r, g, b) = rgb_channels(color);
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Black or white, whichever reads better on `background`
pub fn get_contrast_text_color(background: Color) -> Color {
    // 0.179 is where contrast against black and white is equal
    if luminance(background) > 0.179 {
        Color::Black
    } else {
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_hex_and_rgb() {
        assert_eq!(parse_color("Blue"), Color::Blue);
        assert_eq!(parse_color("darkgrey"), Color::DarkGray);
        assert_eq!(parse_color("#ff9f89"), Color::Rgb(0xff, 0x9f, 0x89));
        assert_eq!(parse_color("#0fa"), Color::Rgb(0x00, 0xff, 0xaa));
        assert_eq!(parse_color("rgb(1, 2, 3)"), Color::Rgb(1, 2, 3));
        assert_eq!(parse_color("rgb(1,2,3,4)"), Color::White);
        assert_eq!(parse_color("#12345"), Color::White);
        assert_eq!(parse_color("chartreuse"), Color::White);
    }

    #[test]
    fn pastel_calendar_colors_get_dark_text() {
        assert_eq!(get_contrast_text_color(parse_color("#a5d6a7")), Color::Black);
        assert_eq!(get_contrast_text_color(parse_color("#f48fb1")), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Black), Color::White);
        assert_eq!(get_contrast_text_color(Color::Blue), Color::White);
    }
}
