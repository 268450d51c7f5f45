//! Color type for effect drawing.
//!
//! A single `Rgba` type with `f64` components and straight (non-premultiplied)
//! alpha. Hex parsing accepts both `#rrggbb` and `#rrggbbaa`; serialization
//! round-trips through the hex form for human-readable configs.

use crate::error::FxError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with straight alpha, components in [0, 1].
///
/// Serializes as a hex string: `"#rrggbb"` when alpha quantizes to 255,
/// `"#rrggbbaa"` otherwise. The hex round-trip has 8-bit quantization
/// (1/255 precision loss), which is acceptable since hex colors are
/// inherently 8-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Creates a color from components in [0, 1].
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses a hex color string like "#6366f1" or "#6366f14d"
    /// (case insensitive, leading `#` optional).
    ///
    /// A 6-digit string parses with alpha 1.0. Returns
    /// `FxError::InvalidColor` for any other length or non-hex digits.
    pub fn from_hex(hex: &str) -> Result<Rgba, FxError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 && hex.len() != 8 {
            return Err(FxError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| FxError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| FxError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| FxError::InvalidColor(format!("invalid blue component: {e}")))?;
        let a = if hex.len() == 8 {
            u8::from_str_radix(&hex[6..8], 16)
                .map_err(|e| FxError::InvalidColor(format!("invalid alpha component: {e}")))?
        } else {
            255
        };
        Ok(Rgba {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        })
    }

    /// Converts the color to a hex string, `"#rrggbb"` when alpha
    /// quantizes to 255 and `"#rrggbbaa"` otherwise.
    ///
    /// Components are quantized to 8-bit (0-255) with rounding.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Quantizes the color to four 8-bit components with rounding,
    /// clamping each input component to [0, 1] first.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// Formats the color as a CSS `rgba(r, g, b, a)` string with 8-bit
    /// color components and a fractional alpha.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {})", self.a.clamp(0.0, 1.0))
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Quantizes a [0, 1] component to 8-bit with rounding.
fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}
