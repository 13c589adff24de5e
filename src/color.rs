//! Hex color parsing.
//!
//! Colors arrive from query strings as bare hex digits: `FE0231` or the
//! short form `E3D` (expanded digit-by-digit to `EE33DD`). No `#` or `0x`
//! marker is accepted.
//!
//! Parsing is split in two steps so each can be tested on its own:
//!
//! - [`parse_color_hex`] turns the digits into a packed 24-bit value.
//! - [`split_color_components`] unpacks the low 24 bits into red/green/blue,
//!   discarding anything above bit 23.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexColorError {
    #[error("color hex must contain either 3 or 6 digits, got {0}")]
    DigitCount(usize),
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

/// An opaque RGB color. Alpha is always implied to be fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Light gray (`#CCCCCC`), the default canvas background.
    pub const DEFAULT_BACKGROUND: Color = Color::new(0xCC, 0xCC, 0xCC);
    /// Dark gray (`#969696`), the default text color.
    pub const DEFAULT_TEXT: Color = Color::new(0x96, 0x96, 0x96);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a 3- or 6-digit hex string into a color.
    pub fn from_hex(hex: &str) -> Result<Self, HexColorError> {
        let (r, g, b) = split_color_components(u64::from(parse_color_hex(hex)?));
        Ok(Self { r, g, b })
    }

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

/// Parse a bare hex color into a packed `0xRRGGBB` value.
///
/// Accepts exactly 3 or 6 hex digits, case-insensitive. The 3-digit form is
/// expanded by doubling each digit, so `"E3D"` parses the same as `"EE33DD"`.
/// Bits above 23 of the result are always zero.
pub fn parse_color_hex(hex: &str) -> Result<u32, HexColorError> {
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HexColorError::InvalidDigit(bad));
    }

    let expanded: String = match hex.len() {
        6 => hex.to_string(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        n => return Err(HexColorError::DigitCount(n)),
    };

    // Every char is an ASCII hex digit and there are six of them, so this
    // cannot overflow; from_str_radix would otherwise accept a leading '+'.
    u32::from_str_radix(&expanded, 16).map_err(|_| HexColorError::DigitCount(hex.len()))
}

/// Extract `(red, green, blue)` from the low 24 bits of `value`.
///
/// Higher bits, e.g. an alpha byte in bits 31..24, are discarded:
/// `0xFF235FED` yields `(0x23, 0x5F, 0xED)`.
pub fn split_color_components(value: u64) -> (u8, u8, u8) {
    let red = ((value >> 16) & 0xFF) as u8;
    let green = ((value >> 8) & 0xFF) as u8;
    let blue = (value & 0xFF) as u8;
    (red, green, blue)
}
