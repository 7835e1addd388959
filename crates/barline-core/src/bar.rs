// File: crates/barline-core/src/bar.rs
// Summary: Bar chart geometry for single, grouped and stacked layouts in either orientation.
// Notes:
// - Categories own equal bands; the bar (or group slot) takes `1 - bar_padding` of it, centered.
// - Stacks accumulate positive and negative values separately from zero, in group order.
// - Only the first point of a (category, group) pair is ever drawn.

use indexmap::IndexMap;
use tracing::trace;

use crate::axis::{Axes, Axis};
use crate::config::{BarMode, ChartConfig};
use crate::data::ProcessedPoint;
use crate::geometry::{clamp, RectF, ScreenPoint};
use crate::legend::{legend_entries, LegendEntry};
use crate::line::DataCoordinate;
use crate::palette::Rgba;
use crate::scale::{BandScale, DataValue, LinearScale};
use crate::state::BarChartState;
use crate::types::Orientation;

#[derive(Clone, Debug, PartialEq)]
pub struct BarPosition<'a> {
    /// Index into the chart's processed data.
    pub index: usize,
    pub group: String,
    pub category: String,
    pub rect: RectF,
    pub color: Rgba,
    pub value: f64,
    /// Stack bounds in data units; `(0, value)` outside stacked mode.
    pub y0: f64,
    pub y1: f64,
    pub data: &'a ProcessedPoint,
}

pub struct BarGeometry<'a> {
    state: &'a BarChartState,
    config: &'a ChartConfig,
}

impl<'a> BarGeometry<'a> {
    pub fn new(state: &'a BarChartState, config: &'a ChartConfig) -> Self {
        Self { state, config }
    }

    fn horizontal(&self) -> bool {
        self.config.orientation == Orientation::Horizontal
    }

    fn band(&self) -> Option<&'a BandScale> {
        let scales = self.state.scales();
        if self.horizontal() { scales.y.as_band() } else { scales.x.as_band() }
    }

    fn value_scale(&self) -> Option<&'a LinearScale> {
        let scales = self.state.scales();
        if self.horizontal() { scales.x.as_linear() } else { scales.y.as_linear() }
    }

    /// Bar thickness inside a slot of `slot` pixels.
    pub fn bar_width(&self, slot: f64) -> f64 {
        let auto = slot * (1.0 - clamp(self.config.bar_padding, 0.0, 1.0));
        let w = self.config.bar_width.map_or(auto, |pinned| pinned.min(auto));
        clamp(w, self.config.min_bar_width, self.config.max_bar_width.max(self.config.min_bar_width))
    }

    fn rect(&self, values: &LinearScale, offset: f64, thickness: f64, v0: f64, v1: f64) -> RectF {
        let (a, b) = (values.map(v0), values.map(v1));
        if self.horizontal() {
            RectF::from_ltrb(a, offset, b, offset + thickness)
        } else {
            RectF::from_ltrb(offset, a, offset + thickness, b)
        }
    }

    /// Bars per visible group, in group order.
    pub fn calculate_bar_positions(&self) -> IndexMap<String, Vec<BarPosition<'a>>> {
        let (Some(band), Some(values)) = (self.band(), self.value_scale()) else { return IndexMap::new() };
        let index = self.state.index();
        let visible = index.visible_groups();
        let colors = &self.state.scales().color;
        let mode = self.config.bar_mode();

        let mut out: IndexMap<String, Vec<BarPosition<'a>>> =
            visible.iter().map(|g| (g.to_string(), Vec::new())).collect();
        let bandwidth = band.bandwidth();
        let n = visible.len().max(1) as f64;
        let group_pad = bandwidth * clamp(self.config.group_padding, 0.0, 0.9);
        let group_slot = (bandwidth - group_pad) / n;
        let stack_width = self.bar_width(bandwidth);
        let mut dropped = 0usize;

        for category in self.state.categories() {
            let Some(start) = band.band_start(category) else { continue };
            let (mut pos, mut neg) = (0.0_f64, 0.0_f64);
            for (gi, group) in visible.iter().enumerate() {
                let Some((i, p)) = self.state.first_match(category, group) else { continue };
                let (offset, thickness, y0, y1) = match mode {
                    BarMode::Single => (start + (bandwidth - stack_width) / 2.0, stack_width, 0.0, p.y),
                    BarMode::Grouped => {
                        let w = self.bar_width(group_slot);
                        let slot_start = start + group_pad / 2.0 + gi as f64 * group_slot;
                        (slot_start + (group_slot - w) / 2.0, w, 0.0, p.y)
                    }
                    BarMode::Stacked => {
                        let base = if p.y < 0.0 { &mut neg } else { &mut pos };
                        let y0 = *base;
                        *base += p.y;
                        (start + (bandwidth - stack_width) / 2.0, stack_width, y0, *base)
                    }
                };
                let rect = self.rect(values, offset, thickness, y0, y1);
                if !rect.is_finite() {
                    dropped += 1;
                    continue;
                }
                if let Some(bars) = out.get_mut(*group) {
                    bars.push(BarPosition {
                        index: i,
                        group: group.to_string(),
                        category: category.to_string(),
                        rect,
                        color: colors.color(group),
                        value: p.y,
                        y0,
                        y1,
                        data: p,
                    });
                }
            }
        }
        trace!(?mode, dropped, "bar positions");
        out
    }

    /// First bar (in group order) containing `(x, y)`.
    pub fn find_bar_at_position(&self, x: f64, y: f64) -> Option<BarPosition<'a>> {
        self.calculate_bar_positions().into_values().flatten().find(|b| b.rect.contains(x, y))
    }

    /// Point on the value end of the bar for `p`, centered across the band.
    pub fn data_to_screen(&self, p: &ProcessedPoint) -> Option<ScreenPoint> {
        let center = self.band()?.center(&p.category())?;
        let v = self.value_scale()?.map(p.y);
        let pt = if self.horizontal() { ScreenPoint::new(v, center) } else { ScreenPoint::new(center, v) };
        pt.is_finite().then_some(pt)
    }

    pub fn screen_to_data(&self, x: f64, y: f64) -> Option<DataCoordinate> {
        let band = self.band()?;
        let values = self.value_scale()?;
        let (along, across) = if self.horizontal() { (x, y) } else { (y, x) };
        let category = DataValue::Category(band.key_at(across)?.to_string());
        let value = DataValue::Number(values.invert(along));
        Some(if self.horizontal() {
            DataCoordinate { x: value, y: category }
        } else {
            DataCoordinate { x: category, y: value }
        })
    }

    pub fn calculate_axes(&self) -> Axes {
        let scales = self.state.scales();
        let ticks = self.config.y_ticks.unwrap_or_else(|| {
            crate::axis::bar_value_ticks(self.horizontal(), scales.inner_width, scales.inner_height)
        });
        // Count only matters for the value axis; interval only for the category axis.
        let interval = self.config.x_tick_interval;
        Axes {
            x: Axis::from_scale(&scales.x, self.config.x_axis_position, ticks, interval)
                .with_label(self.config.x_label.clone()),
            y: Axis::from_scale(&scales.y, self.config.y_axis_position, ticks, interval)
                .with_label(self.config.y_label.clone()),
        }
    }

    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        let index = self.state.index();
        legend_entries(&index.groups(), &self.state.scales().color, |g| index.is_visible(g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ProcessOptions, RawPoint};

    fn state(cfg: &ChartConfig, rows: &[(&str, f64, &str)]) -> BarChartState {
        let mut s = BarChartState::new(cfg);
        let records: Vec<RawPoint> =
            rows.iter().map(|(x, y, g)| RawPoint::new().with("x", *x).with("y", *y).with("group", *g)).collect();
        s.set_data(&records, &ProcessOptions::default().unsorted(), cfg);
        s
    }

    #[test]
    fn single_bars_are_centered_in_band() {
        let cfg = ChartConfig::default();
        let s = state(&cfg, &[("a", 10.0, "g"), ("b", 20.0, "g")]);
        let g = BarGeometry::new(&s, &cfg);
        let bars = &g.calculate_bar_positions()["g"];
        assert_eq!(bars.len(), 2);
        // 720px / 2 bands, 10% padding.
        assert!((bars[0].rect.width - 324.0).abs() < 1e-9);
        assert!((bars[0].rect.x - 18.0).abs() < 1e-9);
        assert_eq!(bars[0].rect.bottom(), 340.0);
    }

    #[test]
    fn negative_values_stack_below_zero() {
        let cfg = ChartConfig { stacked: true, ..ChartConfig::default() };
        let s = state(&cfg, &[("a", 5.0, "p"), ("a", -3.0, "n"), ("a", 2.0, "q")]);
        let g = BarGeometry::new(&s, &cfg);
        let bars = g.calculate_bar_positions();
        assert_eq!((bars["n"][0].y0, bars["n"][0].y1), (0.0, -3.0));
        assert_eq!((bars["q"][0].y0, bars["q"][0].y1), (5.0, 7.0));
    }

    #[test]
    fn horizontal_bars_grow_rightward() {
        let cfg = ChartConfig { orientation: Orientation::Horizontal, ..ChartConfig::default() };
        let s = state(&cfg, &[("a", 10.0, "g")]);
        let g = BarGeometry::new(&s, &cfg);
        let bar = &g.calculate_bar_positions()["g"][0];
        assert_eq!(bar.rect.x, 0.0);
        assert!(bar.rect.width > 0.0);
        let hit = g.find_bar_at_position(bar.rect.x + 1.0, bar.rect.y + 1.0);
        assert_eq!(hit.map(|b| b.category), Some("a".to_string()));
    }
}
