use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::codec::{self, HslTriple, Rgb};
use crate::error::ColorError;

/// A color held either as hex or as HSL.
///
/// Both forms convert into each other; the textual form is kept so a
/// tenant's stored value is echoed back in the notation it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorValue {
    Hex(Rgb),
    Hsl(HslTriple),
}

impl ColorValue {
    pub const fn hex(r: u8, g: u8, b: u8) -> Self {
        ColorValue::Hex(Rgb::new(r, g, b))
    }

    pub fn to_rgb(&self) -> Rgb {
        match *self {
            ColorValue::Hex(rgb) => rgb,
            ColorValue::Hsl(hsl) => codec::hsl_to_rgb(hsl),
        }
    }

    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }

    pub fn to_hsl(&self) -> HslTriple {
        match *self {
            ColorValue::Hex(rgb) => codec::rgb_to_hsl(rgb),
            ColorValue::Hsl(hsl) => hsl,
        }
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrasting_text(&self) -> ColorValue {
        // Midpoint where contrast against black equals contrast against white.
        if self.to_rgb().relative_luminance() > 0.179 {
            ColorValue::hex(0x00, 0x00, 0x00)
        } else {
            ColorValue::hex(0xff, 0xff, 0xff)
        }
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorValue::Hex(rgb) => fmt::Display::fmt(rgb, f),
            ColorValue::Hsl(hsl) => fmt::Display::fmt(hsl, f),
        }
    }
}

impl FromStr for ColorValue {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('#') {
            codec::parse_hex(trimmed).map(ColorValue::Hex)
        } else {
            trimmed.parse::<HslTriple>().map(ColorValue::Hsl)
        }
    }
}

impl TryFrom<String> for ColorValue {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        value.to_string()
    }
}
