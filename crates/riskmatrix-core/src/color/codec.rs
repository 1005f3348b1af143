//! Hex ⇄ HSL conversion.
//!
//! The forward transform normalizes each channel to `[0, 1]`, takes
//! lightness as the midpoint of the extreme channels and derives saturation
//! from their spread. Hue is picked by which channel is the maximum and
//! normalized to `[0, 360)`.
//!
//! `HslTriple` keeps full precision, so `hsl_to_rgb(rgb_to_hsl(c)) == c` for
//! every 8-bit color. Integer rounding (whole degrees, whole percent) is
//! applied only by `HslTriple::rounded` and the `h s% l%` text form; that
//! form is a display format and may drift by a few units per channel.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::ColorError;

/// Returned by the lenient conversions when the input cannot be parsed.
pub const NEUTRAL_DEFAULT: Rgb = Rgb {
    r: 0x80,
    g: 0x80,
    b: 0x80,
};

/// An 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn relative_luminance(self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = f64::from(channel) / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }

        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// Largest per-channel difference between two colors.
    pub fn max_channel_delta(self, other: Rgb) -> u8 {
        self.r
            .abs_diff(other.r)
            .max(self.g.abs_diff(other.g))
            .max(self.b.abs_diff(other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

/// Hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslTriple {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl HslTriple {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Whole degrees and whole percent, hue wrapped back into `[0, 360)`.
    pub fn rounded(self) -> Self {
        Self {
            h: self.h.round().rem_euclid(360.0),
            s: self.s.round().clamp(0.0, 100.0),
            l: self.l.round().clamp(0.0, 100.0),
        }
    }
}

impl fmt::Display for HslTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.rounded();
        write!(f, "{} {}% {}%", r.h, r.s, r.l)
    }
}

impl FromStr for HslTriple {
    type Err = ColorError;

    /// Accepts `h s% l%`, the percent signs being optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [h, sat, light] = parts.as_slice() else {
            return Err(ColorError::invalid(s));
        };

        let number = |raw: &str| -> Result<f64, ColorError> {
            raw.trim_end_matches('%')
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ColorError::invalid(s))
        };

        let h = number(h)?;
        let sat = number(sat)?;
        let light = number(light)?;

        if !(0.0..=100.0).contains(&sat) || !(0.0..=100.0).contains(&light) {
            return Err(ColorError::invalid(s));
        }

        Ok(HslTriple::new(h.rem_euclid(360.0), sat, light))
    }
}

/// Parse a strict `#rrggbb` string (case-insensitive digits, no alpha).
pub fn parse_hex(input: &str) -> Result<Rgb, ColorError> {
    let digits = input
        .strip_prefix('#')
        .filter(|d| d.len() == 6)
        .ok_or_else(|| ColorError::invalid(input))?;

    let mut bytes = [0u8; 3];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| ColorError::invalid(input))?;

    Ok(Rgb::new(bytes[0], bytes[1], bytes[2]))
}

pub fn rgb_to_hsl(rgb: Rgb) -> HslTriple {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;

    // Achromatic: hue is undefined, saturation is zero.
    if delta == 0.0 {
        return HslTriple::new(0.0, 0.0, l * 100.0);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    HslTriple::new((sector * 60.0).rem_euclid(360.0), s * 100.0, l * 100.0)
}

pub fn hsl_to_rgb(hsl: HslTriple) -> Rgb {
    let h = hsl.h.rem_euclid(360.0);
    let s = (hsl.s / 100.0).clamp(0.0, 1.0);
    let l = (hsl.l / 100.0).clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let m = l - chroma / 2.0;

    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

/// Strict conversion: malformed input is an error.
pub fn hex_to_hsl(hex: &str) -> Result<HslTriple, ColorError> {
    parse_hex(hex).map(rgb_to_hsl)
}

/// Lenient conversion for render paths.
///
/// Malformed input is logged and yields the HSL of [`NEUTRAL_DEFAULT`];
/// callers that need to know should validate with [`hex_to_hsl`] first.
pub fn hex_to_hsl_or_default(hex: &str) -> HslTriple {
    hex_to_hsl(hex).unwrap_or_else(|err| {
        warn!(error = %err, "falling back to neutral color");
        rgb_to_hsl(NEUTRAL_DEFAULT)
    })
}

pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    hsl_to_rgb(HslTriple::new(h, s, l)).to_hex()
}
