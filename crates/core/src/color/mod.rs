//! Color samples as read from, and written to, a style surface.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Standard HSL to RGB conversion, channels rounded to the nearest integer.
    pub fn to_rgb(self) -> Rgb {
        let h = self.h / 360.0;
        let s = self.s / 100.0;
        let l = self.l / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };

        Rgb::new(to_byte(r), to_byte(g), to_byte(b))
    }
}

/// Formats as a CSS `hsl()` string with one decimal per component.
impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({:.1}, {:.1}%, {:.1}%)", self.h, self.s, self.l)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// BT.601 weighted luma in `[0, 1]`, computed on the gamma-encoded
    /// channels.
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// A background color in either of the two notations a computed style can
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColorSample {
    Hsl(Hsl),
    Rgb(Rgb),
}

impl ColorSample {
    /// Parses a CSS color string. Strings starting with `hsl` are read as
    /// hue/saturation/lightness, anything else as red/green/blue. Only the
    /// integer part of each numeric token is used. Input with fewer than
    /// three numeric tokens parses as black.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.starts_with("hsl") {
            match first_three(&numeric_tokens(input, true)) {
                Some([h, s, l]) => Self::Hsl(Hsl::new(h, s, l)),
                None => Self::Rgb(Rgb::BLACK),
            }
        } else {
            match first_three(&numeric_tokens(input, false)) {
                Some([r, g, b]) => Self::Rgb(Rgb::new(channel(r), channel(g), channel(b))),
                None => Self::Rgb(Rgb::BLACK),
            }
        }
    }

    pub fn to_rgb(self) -> Rgb {
        match self {
            Self::Hsl(hsl) => hsl.to_rgb(),
            Self::Rgb(rgb) => rgb,
        }
    }

    pub fn luminance(self) -> f64 {
        self.to_rgb().luminance()
    }
}

impl From<Hsl> for ColorSample {
    fn from(value: Hsl) -> Self {
        Self::Hsl(value)
    }
}

impl From<Rgb> for ColorSample {
    fn from(value: Rgb) -> Self {
        Self::Rgb(value)
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Unsigned numeric tokens in order of appearance, truncated to their
/// integer part. With `fractional` set a token may carry one decimal point
/// (`12.5`); otherwise digits after a point start a new token.
fn numeric_tokens(input: &str, fractional: bool) -> Vec<f64> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if !c.is_ascii_digit() {
            continue;
        }
        let mut end = start + 1;
        let mut seen_point = false;
        while let Some(&(idx, next)) = chars.peek() {
            if next.is_ascii_digit() {
                end = idx + 1;
            } else if next == '.' && fractional && !seen_point {
                seen_point = true;
                end = idx + 1;
            } else {
                break;
            }
            chars.next();
        }
        if let Ok(value) = input[start..end].trim_end_matches('.').parse::<f64>() {
            tokens.push(value.trunc());
        }
    }
    tokens
}

fn first_three(tokens: &[f64]) -> Option<[f64; 3]> {
    match tokens {
        [a, b, c, ..] => Some([*a, *b, *c]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hsl_with_one_decimal() {
        let hsl = Hsl::new(123.456, 30.04, 74.96);
        assert_eq!(hsl.to_string(), "hsl(123.5, 30.0%, 75.0%)");
    }

    #[test]
    fn gray_takes_the_zero_saturation_shortcut() {
        let rgb = Hsl::new(0.0, 0.0, 50.0).to_rgb();
        assert!(rgb.r == 127 || rgb.r == 128);
        assert_eq!(rgb.r, rgb.g);
        assert_eq!(rgb.g, rgb.b);
    }

    #[test]
    fn converts_primary_hues() {
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsl::new(120.0, 100.0, 50.0).to_rgb(), Rgb::new(0, 255, 0));
        assert_eq!(Hsl::new(240.0, 100.0, 50.0).to_rgb(), Rgb::new(0, 0, 255));
        assert_eq!(Hsl::new(60.0, 100.0, 75.0).to_rgb(), Rgb::new(255, 255, 128));
    }

    #[test]
    fn luminance_spans_black_to_white() {
        assert_eq!(Rgb::BLACK.luminance(), 0.0);
        assert!((Rgb::new(255, 255, 255).luminance() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!(
            ColorSample::parse("rgb(12, 34, 56)"),
            ColorSample::Rgb(Rgb::new(12, 34, 56))
        );
        assert_eq!(
            ColorSample::parse("rgba(200, 100, 50, 0.5)"),
            ColorSample::Rgb(Rgb::new(200, 100, 50))
        );
    }

    #[test]
    fn parses_fractional_hsl_by_truncation() {
        assert_eq!(
            ColorSample::parse("hsl(210.7, 55.5%, 62.9%)"),
            ColorSample::Hsl(Hsl::new(210.0, 55.0, 62.0))
        );
    }

    #[test]
    fn unparseable_input_falls_back_to_black() {
        for input in ["", "transparent", "#ffffff", "rgb(1, 2)", "hsl(nope)"] {
            assert_eq!(ColorSample::parse(input).to_rgb(), Rgb::BLACK, "{input}");
        }
    }
}
