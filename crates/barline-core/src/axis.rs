// File: crates/barline-core/src/axis.rs
// Summary: Axis model: position, label and positioned ticks derived from a scale.

use crate::scale::{tick_step, Scale, ScaleType};
use crate::types::AxisPosition;

/// Pixels per x tick when no explicit count is configured.
const X_TICK_SPACING: f64 = 80.0;
/// Pixels per y tick on vertical bar charts.
const BAR_Y_TICK_SPACING: f64 = 40.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub label: String,
    /// Pixel offset along the axis, in plot-area coordinates.
    pub position: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub position: AxisPosition,
    pub scale_type: ScaleType,
    pub label: Option<String>,
    pub ticks: Vec<Tick>,
    /// Start/end pixel of the axis line.
    pub extent: (f64, f64),
}

impl Axis {
    /// Build an axis for `scale`. `count` is the requested tick count for
    /// continuous scales; `interval` keeps every n-th ordinal tick.
    pub fn from_scale(scale: &Scale, position: AxisPosition, count: usize, interval: Option<usize>) -> Self {
        let ticks: Vec<Tick> = match scale {
            Scale::Linear(s) => {
                let (d0, d1) = s.domain();
                let step = tick_step(d0.min(d1), d0.max(d1), count);
                s.ticks(count)
                    .into_iter()
                    .map(|v| Tick { label: format_tick(v, step), position: s.map(v) })
                    .collect()
            }
            Scale::Time(s) => {
                let interval = s.interval(count);
                s.ticks(count)
                    .into_iter()
                    .map(|d| Tick { label: interval.format(&d), position: s.map(&d) })
                    .collect()
            }
            Scale::Ordinal(s) => {
                let every = interval.unwrap_or(1).max(1);
                s.domain()
                    .enumerate()
                    .filter(|(i, _)| i % every == 0)
                    .filter_map(|(_, k)| s.center(k).map(|px| Tick { label: k.to_string(), position: px }))
                    .collect()
            }
        };
        let (r0, r1) = scale.range();
        Self {
            position,
            scale_type: scale.scale_type(),
            label: None,
            ticks: ticks.into_iter().filter(|t| t.position.is_finite()).collect(),
            extent: (r0.min(r1), r0.max(r1)),
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }
}

/// Horizontal and vertical axes of one chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Axes {
    pub x: Axis,
    pub y: Axis,
}

/// Default x tick count from the plot width: one per 80px, between 2 and 10.
pub fn default_x_ticks(inner_width: f64) -> usize {
    ((inner_width / X_TICK_SPACING).floor() as usize).clamp(2, 10)
}

/// Value-axis tick count for bar charts: `min(6, h/40)` vertically, `min(8, w/80)` horizontally.
/// Never below 1, so a very short plot still gets a labelled value axis.
pub fn bar_value_ticks(horizontal: bool, inner_width: f64, inner_height: f64) -> usize {
    let n = if horizontal {
        ((inner_width / X_TICK_SPACING).floor() as usize).min(8)
    } else {
        ((inner_height / BAR_Y_TICK_SPACING).floor() as usize).min(6)
    };
    n.max(1)
}

/// Label for a numeric tick with as many decimals as the step needs.
pub fn format_tick(v: f64, step: f64) -> String {
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    let s = format!("{v:.decimals$}");
    match s.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{BandScale, LinearScale};

    #[test]
    fn tick_labels_follow_step() {
        assert_eq!(format_tick(0.30000000000000004, 0.1), "0.3");
        assert_eq!(format_tick(1500.0, 500.0), "1500");
        assert_eq!(format_tick(-0.0, 1.0), "0");
        assert_eq!(format_tick(-0.0, 0.5), "0.0");
    }

    #[test]
    fn ordinal_interval_thins_ticks() {
        let keys = ["a", "b", "c", "d", "e"].map(String::from);
        let scale = Scale::Ordinal(BandScale::point(keys, (0.0, 400.0), 0.5));
        let axis = Axis::from_scale(&scale, AxisPosition::Bottom, 5, Some(2));
        let labels: Vec<_> = axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["a", "c", "e"]);
    }

    #[test]
    fn linear_axis_positions_ticks_in_pixels() {
        let scale = Scale::Linear(LinearScale::new((0.0, 100.0), (200.0, 0.0)));
        let axis = Axis::from_scale(&scale, AxisPosition::Left, 5, None);
        assert_eq!(axis.ticks.first().map(|t| t.position), Some(200.0));
        assert_eq!(axis.ticks.last().map(|t| (t.label.as_str(), t.position)), Some(("100", 0.0)));
        assert_eq!(axis.extent, (0.0, 200.0));
    }

    #[test]
    fn bar_tick_counts() {
        assert_eq!(bar_value_ticks(false, 720.0, 340.0), 6);
        assert_eq!(bar_value_ticks(false, 720.0, 120.0), 3);
        assert_eq!(bar_value_ticks(true, 400.0, 340.0), 5);
        assert_eq!(bar_value_ticks(false, 720.0, 30.0), 1);
    }
}
