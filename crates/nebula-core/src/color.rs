//! # Color Module
//!
//! Packed ARGB32 colors as used by the layer palettes.
//!
//! ## Responsibilities
//! - **Parsing**: hex strings (`#AARRGGBB`, `#RRGGBB`) and comma separated lists.
//! - **Alpha Resolution**: applying the optional fill/stroke alpha overrides.
//! - **Cyclic Lookup**: palette entries are read at `min(i, len - 1)`.

use crate::errors::{NebulaError, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A color packed as `0xAARRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Argb(pub u32);

impl Argb {
    pub const TRANSPARENT: Argb = Argb(0x0000_0000);
    pub const BLACK: Argb = Argb(0xFF00_0000);
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Argb((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Replaces the alpha byte, keeping the RGB channels.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Argb((self.0 & 0x00FF_FFFF) | (alpha as u32) << 24)
    }

    /// Replaces the alpha byte with `trunc(255 * fraction)`; `fraction` is clamped to `[0, 1]`.
    pub fn with_alpha_fraction(self, fraction: f32) -> Self {
        self.with_alpha((255.0 * fraction.clamp(0.0, 1.0)) as u8)
    }

    pub const fn is_transparent(self) -> bool {
        self.alpha() == 0
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Serializes as `"#AARRGGBB"`. Fully transparent colors are written as packed integers,
/// since parsing a hex string with a zero alpha byte yields an opaque color.
impl Serialize for Argb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.is_transparent() {
            serializer.serialize_u32(self.0)
        } else {
            serializer.collect_str(self)
        }
    }
}

impl FromStr for Argb {
    type Err = NebulaError;

    /// Parses a hex color. `#` and whitespace are ignored; a color whose alpha byte
    /// is zero (including six-digit `RRGGBB` forms) is made fully opaque.
    fn from_str(s: &str) -> Result<Self> {
        let digits: String = s
            .chars()
            .filter(|c| *c != '#' && !c.is_whitespace())
            .collect();
        if digits.is_empty() {
            return Err(NebulaError::InvalidColor(s.to_string()));
        }
        let value = u32::from_str_radix(&digits, 16)
            .map_err(|_| NebulaError::InvalidColor(s.to_string()))?;
        let color = Argb(value);
        Ok(if color.is_transparent() {
            color.with_alpha(0xFF)
        } else {
            color
        })
    }
}

/// Serialized form: a hex string, or a raw packed integer taken verbatim.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Packed(u32),
    Text(String),
}

impl TryFrom<ColorRepr> for Argb {
    type Error = NebulaError;

    fn try_from(repr: ColorRepr) -> Result<Self> {
        match repr {
            ColorRepr::Packed(value) => Ok(Argb(value)),
            ColorRepr::Text(text) => text.parse(),
        }
    }
}

/// Parses a comma separated color list such as `"#FF0000, 80808080"`.
pub fn parse_color_list(text: &str) -> Result<Vec<Argb>> {
    text.split(',').map(str::parse).collect()
}

/// Reads `list[min(index, len - 1)]`; `None` only for an empty list.
pub fn cyclic<T: Copy>(list: &[T], index: usize) -> Option<T> {
    list.get(index.min(list.len().saturating_sub(1))).copied()
}

/// Resolves the color a painter should use, or `None` when the paint is skipped.
///
/// With an override the alpha byte is replaced by the override fraction. Without one,
/// a color whose own alpha is zero is not painted at all.
pub fn resolve_paint(base: Argb, alpha_override: Option<f32>) -> Option<Argb> {
    match alpha_override {
        Some(fraction) => Some(base.with_alpha_fraction(fraction)),
        None if base.is_transparent() => None,
        None => Some(base),
    }
}
