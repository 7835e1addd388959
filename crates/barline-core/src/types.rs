// File: crates/barline-core/src/types.rs
// Summary: Shared types and constants (sizes, margins, orientation, axis positions).

use serde::{Deserialize, Serialize};

/// Default chart width in pixels.
pub const WIDTH: f64 = 800.0;
/// Default chart height in pixels.
pub const HEIGHT: f64 = 400.0;

/// Chart margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
    /// Total horizontal margin (left + right).
    pub fn hsum(&self) -> f64 { self.left + self.right }
    /// Total vertical margin (top + bottom).
    pub fn vsum(&self) -> f64 { self.top + self.bottom }

    /// Every side multiplied by `factor`, each floored at the matching side of `floor`.
    pub fn scaled(&self, factor: f64, floor: &Margins) -> Self {
        Self {
            top: (self.top * factor).max(floor.top),
            right: (self.right * factor).max(floor.right),
            bottom: (self.bottom * factor).max(floor.bottom),
            left: (self.left * factor).max(floor.left),
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(20.0, 30.0, 40.0, 50.0)
    }
}

/// Outer chart size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Plot area after margins. Never negative.
    pub fn inner(&self, margins: &Margins) -> Size {
        Size {
            width: (self.width - margins.hsum()).max(0.0),
            height: (self.height - margins.vsum()).max(0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl AxisPosition {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, AxisPosition::Top | AxisPosition::Bottom)
    }
}
