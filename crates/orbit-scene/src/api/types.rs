use serde::{Deserialize, Serialize};

/// Unique identifier for a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identifier for a tracked scroll-reveal trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevealId(pub u32);

/// Linear RGB color, each channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };
    /// Soft violet used when a configured hex string does not parse.
    pub const NEUTRAL: Self = Self { r: 0.608, g: 0.529, b: 0.961 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Parse `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match digits.len() {
            6 => Some(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let short = |i: usize| {
                    let c = &digits[i..i + 1];
                    u8::from_str_radix(c, 16).ok().map(|v| (v * 17) as f32 / 255.0)
                };
                Some(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => None,
        }
    }

    /// Parse a configured color, falling back to `NEUTRAL` with a warning.
    pub fn from_hex_or_neutral(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_else(|| {
            log::warn!("unparsable color {hex:?}, using neutral");
            Self::NEUTRAL
        })
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::NEUTRAL
    }
}
