//! CSS color parsing and contrast computation for badges.

/// Relative luminance above which badge text is black
pub const LUMINANCE_THRESHOLD: f64 = 0.45;
/// Luminance assumed for colors that cannot be parsed
pub const UNKNOWN_LUMINANCE: f64 = 0.5;

pub const TEXT_BLACK: &str = "#000000";
pub const TEXT_WHITE: &str = "#FFFFFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

const NAMED_COLORS: [(&str, Rgb); 10] = [
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("orange", Rgb::new(255, 165, 0)),
    ("firebrick", Rgb::new(178, 34, 34)),
];

/// Parse `#RRGGBB`, `#RGB`, `rgb()`/`rgba()`, `hsl()`/`hsla()` or a known color name
pub fn parse_color(color: &str) -> Option<Rgb> {
    let color = color.trim();
    if color.is_empty() {
        return None;
    }

    if let Some(hex) = color.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = color.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, &["rgba(", "rgb("]) {
        let [r, g, b] = leading_numbers(args)?;
        return Some(Rgb::new(clamp_channel(r), clamp_channel(g), clamp_channel(b)));
    }
    if let Some(args) = function_args(&lower, &["hsla(", "hsl("]) {
        let [h, s, l] = leading_numbers(args)?;
        return Some(hsl_to_rgb(h, s, l));
    }

    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| *rgb)
}

/// WCAG relative luminance in 0..=1, [`UNKNOWN_LUMINANCE`] for unparsable input
pub fn relative_luminance(color: &str) -> f64 {
    let Some(rgb) = parse_color(color) else {
        return UNKNOWN_LUMINANCE;
    };

    fn linearize(channel: u8) -> f64 {
        let value = f64::from(channel) / 255.0;
        if value <= 0.03928 {
            value / 12.92
        } else {
            ((value + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

/// Black text on light backgrounds, white otherwise
pub fn contrast_text_color(background: &str) -> &'static str {
    if relative_luminance(background) > LUMINANCE_THRESHOLD {
        TEXT_BLACK
    } else {
        TEXT_WHITE
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Rgb::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let doubled: Vec<String> = hex.chars().map(|c| format!("{c}{c}")).collect();
            Some(Rgb::new(channel(&doubled[0])?, channel(&doubled[1])?, channel(&doubled[2])?))
        }
        _ => None,
    }
}

fn function_args<'a>(color: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes
        .iter()
        .find_map(|prefix| color.strip_prefix(prefix))
}

/// First three comma-separated integers, ignoring `%` suffixes
fn leading_numbers(args: &str) -> Option<[u32; 3]> {
    let mut numbers = args
        .trim_end_matches(')')
        .split(',')
        .map(|part| part.trim().trim_end_matches('%').parse::<u32>().ok());
    Some([numbers.next()??, numbers.next()??, numbers.next()??])
}

fn clamp_channel(value: u32) -> u8 {
    value.min(255) as u8
}

fn hsl_to_rgb(hue: u32, saturation: u32, lightness: u32) -> Rgb {
    let h = f64::from(hue) / 360.0;
    let s = f64::from(saturation.min(100)) / 100.0;
    let l = f64::from(lightness.min(100)) / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 1.0 / 6.0 {
        (c, x, 0.0)
    } else if h < 2.0 / 6.0 {
        (x, c, 0.0)
    } else if h < 3.0 / 6.0 {
        (0.0, c, x)
    } else if h < 4.0 / 6.0 {
        (0.0, x, c)
    } else if h < 5.0 / 6.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let to_channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_color("#FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(parse_color("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_functional_notation() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(Rgb::new(10, 20, 30)));
        assert_eq!(parse_color("RGBA(10,20,30,0.5)"), Some(Rgb::new(10, 20, 30)));
        assert_eq!(parse_color("hsl(0, 100%, 50%)"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(parse_color("hsla(120, 100%, 25%, 1)"), Some(Rgb::new(0, 128, 0)));
        assert_eq!(parse_color("rgb(10, 20)"), None);
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color("Firebrick"), Some(Rgb::new(178, 34, 34)));
        assert_eq!(parse_color("orange"), Some(Rgb::new(255, 165, 0)));
        assert_eq!(parse_color("rebeccapurple"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(relative_luminance("#000000"), 0.0);
        assert!((relative_luminance("#FFFFFF") - 1.0).abs() < 1e-9);
        assert_eq!(relative_luminance("not-a-color"), UNKNOWN_LUMINANCE);
    }

    #[test]
    fn test_contrast_text_color() {
        assert_eq!(contrast_text_color("#000000"), TEXT_WHITE);
        assert_eq!(contrast_text_color("#FFFFFF"), TEXT_BLACK);
        assert_eq!(contrast_text_color("yellow"), TEXT_BLACK);
        assert_eq!(contrast_text_color("firebrick"), TEXT_WHITE);
        // unparsable colors count as 0.5, above the threshold
        assert_eq!(contrast_text_color("???"), TEXT_BLACK);
        // #E1E5E9 is light
        assert_eq!(contrast_text_color("#E1E5E9"), TEXT_BLACK);
    }
}
