// File: crates/barline-core/src/config.rs
// Summary: Layered chart configuration: base defaults, then a preset overlay, then user overlays,
//          then a runtime overlay owned by the chart (responsive layout).
// Notes:
// - `ChartConfig` is the resolved view; `ConfigLayer` mirrors it with every field optional.
// - Nested sections (trend, responsive, legend) are replaced as a unit; a partial
//   table in TOML is completed from that section's defaults by serde.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curve::CurveType;
use crate::error::Result;
use crate::legend::LegendOptions;
use crate::palette::{self, Rgba};
use crate::responsive::ResponsiveConfig;
use crate::scale::ScaleType;
use crate::trend::TrendConfig;
use crate::types::{AxisPosition, Margins, Orientation, Size, HEIGHT, WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Bar layout mode. `stacked` wins when both flags are set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarMode {
    #[default]
    Single,
    Grouped,
    Stacked,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub orientation: Orientation,
    pub stacked: bool,
    pub grouped: bool,
    /// Fraction of a band (or group slot) left empty around a bar.
    pub bar_padding: f64,
    /// Fraction of a band left empty between grouped slots.
    pub group_padding: f64,
    /// Pinned bar width; `None` lets the band decide.
    pub bar_width: Option<f64>,
    pub min_bar_width: f64,
    pub max_bar_width: f64,
    pub curve: CurveType,
    pub dot_radius: f64,
    pub show_dots: bool,
    pub show_area: bool,
    pub trend: TrendConfig,
    /// Forces the x scale type instead of detecting it from data.
    pub x_scale_type: Option<ScaleType>,
    pub x_ticks: Option<usize>,
    pub y_ticks: Option<usize>,
    /// Show every n-th ordinal tick.
    pub x_tick_interval: Option<usize>,
    pub x_axis_position: AxisPosition,
    pub y_axis_position: AxisPosition,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub nice: bool,
    pub palette: Option<Vec<Rgba>>,
    pub responsive: ResponsiveConfig,
    pub legend: LegendOptions,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            margins: Margins::default(),
            orientation: Orientation::Vertical,
            stacked: false,
            grouped: false,
            bar_padding: 0.1,
            group_padding: 0.05,
            bar_width: None,
            min_bar_width: 2.0,
            max_bar_width: 120.0,
            curve: CurveType::Linear,
            dot_radius: 4.0,
            show_dots: true,
            show_area: false,
            trend: TrendConfig::default(),
            x_scale_type: None,
            x_ticks: None,
            y_ticks: None,
            x_tick_interval: None,
            x_axis_position: AxisPosition::Bottom,
            y_axis_position: AxisPosition::Left,
            x_label: None,
            y_label: None,
            nice: true,
            palette: None,
            responsive: ResponsiveConfig::default(),
            legend: LegendOptions::default(),
        }
    }
}

impl ChartConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Plot area after margins, clamped at zero.
    pub fn inner_size(&self) -> Size {
        self.size().inner(&self.margins)
    }

    pub fn bar_mode(&self) -> BarMode {
        if self.stacked {
            BarMode::Stacked
        } else if self.grouped {
            BarMode::Grouped
        } else {
            BarMode::Single
        }
    }

    /// User palette, else the chart type's palette.
    pub fn palette_for(&self, kind: ChartKind) -> Vec<Rgba> {
        match &self.palette {
            Some(p) if !p.is_empty() => p.clone(),
            _ => palette::default_palette(kind).to_vec(),
        }
    }
}

/// Partial configuration; `None` means "inherit from the layer below".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margins: Option<Margins>,
    pub orientation: Option<Orientation>,
    pub stacked: Option<bool>,
    pub grouped: Option<bool>,
    pub bar_padding: Option<f64>,
    pub group_padding: Option<f64>,
    pub bar_width: Option<f64>,
    pub min_bar_width: Option<f64>,
    pub max_bar_width: Option<f64>,
    pub curve: Option<CurveType>,
    pub dot_radius: Option<f64>,
    pub show_dots: Option<bool>,
    pub show_area: Option<bool>,
    pub trend: Option<TrendConfig>,
    pub x_scale_type: Option<ScaleType>,
    pub x_ticks: Option<usize>,
    pub y_ticks: Option<usize>,
    pub x_tick_interval: Option<usize>,
    pub x_axis_position: Option<AxisPosition>,
    pub y_axis_position: Option<AxisPosition>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub nice: Option<bool>,
    pub palette: Option<Vec<Rgba>>,
    pub responsive: Option<ResponsiveConfig>,
    pub legend: Option<LegendOptions>,
}

// Lists every layer field once so apply/merge cannot drift apart.
macro_rules! for_each_field {
    ($m:ident) => {
        $m!(
            width, height, margins, orientation, stacked, grouped, bar_padding, group_padding,
            min_bar_width, max_bar_width, curve, dot_radius, show_dots, show_area, trend,
            x_axis_position, y_axis_position, nice, responsive, legend
        );
    };
}

// Fields whose resolved type is itself optional.
macro_rules! for_each_optional_field {
    ($m:ident) => {
        $m!(bar_width, x_scale_type, x_ticks, y_ticks, x_tick_interval, x_label, y_label, palette);
    };
}

impl ConfigLayer {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Write every set field onto `cfg`.
    pub fn apply_to(&self, cfg: &mut ChartConfig) {
        macro_rules! set {
            ($($f:ident),*) => { $( if let Some(v) = &self.$f { cfg.$f = v.clone(); } )* };
        }
        macro_rules! set_opt {
            ($($f:ident),*) => { $( if let Some(v) = &self.$f { cfg.$f = Some(v.clone()); } )* };
        }
        for_each_field!(set);
        for_each_optional_field!(set_opt);
    }

    /// `over` wins field-by-field.
    pub fn merged(&self, over: &ConfigLayer) -> ConfigLayer {
        let mut out = self.clone();
        macro_rules! take {
            ($($f:ident),*) => { $( if over.$f.is_some() { out.$f = over.$f.clone(); } )* };
        }
        for_each_field!(take);
        for_each_optional_field!(take);
        out
    }

    pub fn is_empty(&self) -> bool {
        *self == ConfigLayer::default()
    }
}

/// Base defaults → preset → user → runtime, always in that order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayeredConfig {
    preset: Option<ConfigLayer>,
    user: ConfigLayer,
    runtime: ConfigLayer,
}

impl LayeredConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a named preset overlay; see [`palette::presets`].
    pub fn with_preset(mut self, name: &str) -> Result<Self> {
        self.set_preset(name)?;
        Ok(self)
    }

    pub fn set_preset(&mut self, name: &str) -> Result<()> {
        self.preset = Some(palette::find_preset(name)?.layer);
        Ok(())
    }

    pub fn with_user(mut self, layer: ConfigLayer) -> Self {
        self.apply_user(&layer);
        self
    }

    /// Merge a later user update over earlier ones.
    pub fn apply_user(&mut self, layer: &ConfigLayer) {
        self.user = self.user.merged(layer);
    }

    pub fn user(&self) -> &ConfigLayer {
        &self.user
    }

    /// Replace the runtime overlay wholesale. Charts use it for computed
    /// layout so that the user layer keeps reflecting only what was asked for.
    pub fn set_runtime(&mut self, layer: ConfigLayer) {
        self.runtime = layer;
    }

    pub fn runtime(&self) -> &ConfigLayer {
        &self.runtime
    }

    /// Defaults, preset and user layers only.
    pub fn resolve_declared(&self) -> ChartConfig {
        let mut cfg = ChartConfig::default();
        if let Some(preset) = &self.preset {
            preset.apply_to(&mut cfg);
        }
        self.user.apply_to(&mut cfg);
        cfg
    }

    pub fn resolve(&self) -> ChartConfig {
        let mut cfg = self.resolve_declared();
        self.runtime.apply_to(&mut cfg);
        debug!(width = cfg.width, height = cfg.height, "resolved chart config");
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_takes_precedence_over_grouped() {
        let cfg = ChartConfig { stacked: true, grouped: true, ..ChartConfig::default() };
        assert_eq!(cfg.bar_mode(), BarMode::Stacked);
    }

    #[test]
    fn later_user_layers_win() {
        let mut layered = LayeredConfig::new();
        layered.apply_user(&ConfigLayer { width: Some(500.0), dot_radius: Some(2.0), ..Default::default() });
        layered.apply_user(&ConfigLayer { width: Some(640.0), ..Default::default() });
        let cfg = layered.resolve();
        assert_eq!(cfg.width, 640.0);
        assert_eq!(cfg.dot_radius, 2.0);
    }

    #[test]
    fn runtime_layer_applies_last_without_touching_user() {
        let mut layered = LayeredConfig::new().with_user(ConfigLayer { width: Some(500.0), ..Default::default() });
        layered.set_runtime(ConfigLayer { width: Some(900.0), ..Default::default() });
        assert_eq!(layered.resolve().width, 900.0);
        assert_eq!(layered.user().width, Some(500.0));
    }

    #[test]
    fn toml_layer_rejects_unknown_keys() {
        let layer = ConfigLayer::from_toml_str("width = 300.0\ncurve = \"monotone\"").expect("parse");
        assert_eq!(layer.curve, Some(CurveType::Monotone));
        assert!(ConfigLayer::from_toml_str("colour = 1").is_err());
    }
}
