//! Color handling for level swatches.

pub mod codec;
pub mod value;

pub use codec::{HslTriple, NEUTRAL_DEFAULT, Rgb, hex_to_hsl, hex_to_hsl_or_default, hsl_to_hex};
pub use value::ColorValue;
