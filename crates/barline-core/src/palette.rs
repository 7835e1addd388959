// File: crates/barline-core/src/palette.rs
// Summary: Colors, per-chart-type palettes, and named configuration presets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{ChartKind, ConfigLayer};
use crate::error::{ChartError, Result};
use crate::types::Margins;

/// 8-bit RGBA color; serializes as `#rrggbb` / `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let nib = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok().map(|v| v * 17);
                Some(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;
    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Rgba::from_hex(&s).ok_or_else(|| format!("invalid color `{s}`"))
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        c.to_hex()
    }
}

/// Fixed 10-color categorical fallback.
pub const CATEGORY10: [Rgba; 10] = [
    Rgba::rgb(0x1f, 0x77, 0xb4),
    Rgba::rgb(0xff, 0x7f, 0x0e),
    Rgba::rgb(0x2c, 0xa0, 0x2c),
    Rgba::rgb(0xd6, 0x27, 0x28),
    Rgba::rgb(0x94, 0x67, 0xbd),
    Rgba::rgb(0x8c, 0x56, 0x4b),
    Rgba::rgb(0xe3, 0x77, 0xc2),
    Rgba::rgb(0x7f, 0x7f, 0x7f),
    Rgba::rgb(0xbc, 0xbd, 0x22),
    Rgba::rgb(0x17, 0xbe, 0xcf),
];

pub const LINE_PALETTE: [Rgba; 8] = [
    Rgba::rgb(0x40, 0xa0, 0xff), // blue
    Rgba::rgb(0x28, 0xc8, 0x78), // green
    Rgba::rgb(0xff, 0x9f, 0x1c),
    Rgba::rgb(0xdc, 0x50, 0x50),
    Rgba::rgb(0x8b, 0x5c, 0xf6),
    Rgba::rgb(0x06, 0xb6, 0xd4),
    Rgba::rgb(0xec, 0x48, 0x99),
    Rgba::rgb(0x84, 0xcc, 0x16),
];

pub const BAR_PALETTE: [Rgba; 8] = [
    Rgba::rgb(0x3b, 0x82, 0xf6),
    Rgba::rgb(0x10, 0xb9, 0x81),
    Rgba::rgb(0xf5, 0x9e, 0x0b),
    Rgba::rgb(0xef, 0x44, 0x44),
    Rgba::rgb(0x8b, 0x5c, 0xf6),
    Rgba::rgb(0x06, 0xb6, 0xd4),
    Rgba::rgb(0xf9, 0x73, 0x16),
    Rgba::rgb(0x63, 0x66, 0xf1),
];

pub fn default_palette(kind: ChartKind) -> &'static [Rgba] {
    match kind {
        ChartKind::Line => &LINE_PALETTE,
        ChartKind::Bar => &BAR_PALETTE,
    }
}

/// Named configuration overlay.
#[derive(Clone, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub layer: ConfigLayer,
}

/// Return the list of built-in presets.
pub fn presets() -> Vec<Preset> {
    vec![
        Preset { name: "default", layer: ConfigLayer::default() },
        Preset {
            name: "compact",
            layer: ConfigLayer {
                margins: Some(Margins::new(10.0, 10.0, 25.0, 35.0)),
                dot_radius: Some(3.0),
                bar_padding: Some(0.05),
                y_ticks: Some(4),
                ..Default::default()
            },
        },
        Preset {
            name: "presentation",
            layer: ConfigLayer {
                width: Some(1200.0),
                height: Some(600.0),
                margins: Some(Margins::new(30.0, 40.0, 60.0, 70.0)),
                dot_radius: Some(6.0),
                curve: Some(crate::curve::CurveType::Monotone),
                ..Default::default()
            },
        },
        Preset {
            name: "dark",
            layer: ConfigLayer {
                palette: Some(vec![
                    Rgba::rgb(0x40, 0xa0, 0xff),
                    Rgba::rgb(0x28, 0xc8, 0x78),
                    Rgba::rgb(0xff, 0xe6, 0x46),
                    Rgba::rgb(0xdc, 0x50, 0x50),
                    Rgba::rgb(0xb4, 0x8c, 0xff),
                    Rgba::rgb(0x60, 0x9c, 0xff),
                ]),
                ..Default::default()
            },
        },
        Preset {
            name: "high-contrast",
            layer: ConfigLayer {
                palette: Some(vec![
                    Rgba::rgb(0x00, 0xff, 0xff),
                    Rgba::rgb(0xff, 0xff, 0x00),
                    Rgba::rgb(0x00, 0xff, 0x00),
                    Rgba::rgb(0xff, 0x00, 0xff),
                    Rgba::rgb(0xff, 0xff, 0xff),
                ]),
                dot_radius: Some(5.0),
                ..Default::default()
            },
        },
    ]
}

/// Find a preset by `name` (case-insensitive).
pub fn find_preset(name: &str) -> Result<Preset> {
    presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ChartError::UnknownPreset(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(Rgba::from_hex("#1f77b4"), Some(Rgba::rgb(0x1f, 0x77, 0xb4)));
        assert_eq!(Rgba::from_hex("fff"), Some(Rgba::rgb(255, 255, 255)));
        assert_eq!(Rgba::from_hex("#00000080").map(|c| c.a), Some(0x80));
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(4).to_hex(), "#01020304");
    }
}
