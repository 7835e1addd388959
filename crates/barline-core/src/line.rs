// File: crates/barline-core/src/line.rs
// Summary: Line chart geometry: paths, areas, dots, trend segments, axes and hit testing.
// Notes:
// - All outputs are in plot-area pixels (origin at the inner top-left corner).
// - Points whose projection is not finite are dropped before any path is built.

use indexmap::IndexMap;
use tracing::trace;

use crate::axis::{default_x_ticks, Axes, Axis};
use crate::config::ChartConfig;
use crate::curve::{curve_path, write_curve};
use crate::data::ProcessedPoint;
use crate::geometry::ScreenPoint;
use crate::legend::{legend_entries, LegendEntry};
use crate::path::PathBuilder;
use crate::scale::{DataValue, ScaleBundle};
use crate::state::LineChartState;
use crate::trend::TrendSegment;

/// Extra pixels around a dot that still count as a hit.
pub const HIT_SLOP: f64 = 5.0;

/// A rendered dot and the point it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct DotPosition<'a> {
    pub index: usize,
    pub center: ScreenPoint,
    pub radius: f64,
    pub data: &'a ProcessedPoint,
}

/// Pixel position recovered as data coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct DataCoordinate {
    pub x: DataValue,
    pub y: DataValue,
}

pub struct LineGeometry<'a> {
    state: &'a LineChartState,
    config: &'a ChartConfig,
}

impl<'a> LineGeometry<'a> {
    pub fn new(state: &'a LineChartState, config: &'a ChartConfig) -> Self {
        Self { state, config }
    }

    fn scales(&self) -> &'a ScaleBundle {
        self.state.scales()
    }

    /// Screen position of a point, or `None` when it cannot be placed.
    pub fn data_to_screen(&self, p: &ProcessedPoint) -> Option<ScreenPoint> {
        let scales = self.scales();
        let x = scales.x.project_x(p)?;
        let y = scales.y.as_linear()?.map(p.y);
        let pt = ScreenPoint::new(x, y);
        pt.is_finite().then_some(pt)
    }

    pub fn screen_to_data(&self, x: f64, y: f64) -> Option<DataCoordinate> {
        let scales = self.scales();
        Some(DataCoordinate { x: scales.x.invert(x)?, y: scales.y.invert(y)? })
    }

    /// Visible groups with their placeable points, in group order.
    fn projected(&self) -> IndexMap<&'a str, Vec<(usize, ScreenPoint)>> {
        let index = self.state.index();
        let mut out = IndexMap::new();
        for g in index.visible_groups() {
            let pts: Vec<(usize, ScreenPoint)> = index
                .group_indices(g)
                .iter()
                .filter_map(|&i| Some((i, self.data_to_screen(&index.data()[i])?)))
                .collect();
            out.insert(g, pts);
        }
        out
    }

    /// One path per visible group with at least one placeable point.
    pub fn calculate_line_paths(&self) -> IndexMap<String, String> {
        self.projected()
            .into_iter()
            .filter(|(_, pts)| !pts.is_empty())
            .map(|(g, pts)| {
                let screen: Vec<ScreenPoint> = pts.iter().map(|(_, p)| *p).collect();
                (g.to_string(), curve_path(&screen, self.config.curve))
            })
            .collect()
    }

    /// Closed area paths filled down to the zero line (clamped to the plot).
    pub fn calculate_area_paths(&self) -> IndexMap<String, String> {
        let Some(y) = self.scales().y.as_linear() else { return IndexMap::new() };
        let (r0, r1) = y.range();
        let baseline = y.map(0.0).clamp(r0.min(r1), r0.max(r1));
        self.projected()
            .into_iter()
            .filter(|(_, pts)| !pts.is_empty())
            .map(|(g, pts)| {
                let screen: Vec<ScreenPoint> = pts.iter().map(|(_, p)| *p).collect();
                let mut b = PathBuilder::new();
                b.move_to(screen[0].x, baseline);
                write_curve(&mut b, &screen, self.config.curve, false);
                if let Some(last) = screen.last() {
                    b.line_to(last.x, baseline);
                }
                b.close();
                (g.to_string(), b.finish())
            })
            .collect()
    }

    pub fn calculate_dot_positions(&self) -> IndexMap<String, Vec<DotPosition<'a>>> {
        let data = self.state.index().data();
        let radius = self.config.dot_radius;
        self.projected()
            .into_iter()
            .map(|(g, pts)| {
                let dots = pts
                    .into_iter()
                    .map(|(index, center)| DotPosition { index, center, radius, data: &data[index] })
                    .collect();
                (g.to_string(), dots)
            })
            .collect()
    }

    /// Nearest visible point closer than `dot_radius + HIT_SLOP` to `(x, y)`.
    pub fn find_data_at_position(&self, x: f64, y: f64) -> Option<(usize, &'a ProcessedPoint)> {
        let target = ScreenPoint::new(x, y);
        let threshold = self.config.dot_radius + HIT_SLOP;
        let data = self.state.index().data();
        self.projected()
            .into_values()
            .flatten()
            .map(|(i, p)| (i, p.distance(&target)))
            .filter(|(_, d)| *d < threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| (i, &data[i]))
    }

    /// Visible point whose x is closest to `x`, ignoring y.
    pub fn find_nearest_data_point_by_x(&self, x: f64) -> Option<(usize, &'a ProcessedPoint)> {
        if !x.is_finite() {
            return None;
        }
        let data = self.state.index().data();
        self.projected()
            .into_values()
            .flatten()
            .min_by(|a, b| (a.1.x - x).abs().total_cmp(&(b.1.x - x).abs()))
            .map(|(i, _)| (i, &data[i]))
    }

    pub fn calculate_axes(&self) -> Axes {
        let scales = self.scales();
        let x_ticks = self.config.x_ticks.unwrap_or_else(|| default_x_ticks(scales.inner_width));
        let y_ticks = self.config.y_ticks.unwrap_or(5);
        Axes {
            x: Axis::from_scale(&scales.x, self.config.x_axis_position, x_ticks, self.config.x_tick_interval)
                .with_label(self.config.x_label.clone()),
            y: Axis::from_scale(&scales.y, self.config.y_axis_position, y_ticks, None)
                .with_label(self.config.y_label.clone()),
        }
    }

    pub fn legend_entries(&self) -> Vec<LegendEntry> {
        let index = self.state.index();
        legend_entries(&index.groups(), &self.scales().color, |g| index.is_visible(g))
    }

    /// Dashed-extension segments from each visible group's last point.
    pub fn calculate_trend_extensions(&self) -> Vec<TrendSegment> {
        let scales = self.scales();
        let Some(y) = scales.y.as_linear() else { return Vec::new() };
        let segments: Vec<TrendSegment> = self
            .state
            .trend_projections(self.config)
            .into_iter()
            .filter_map(|(group, pts)| {
                let (start, end) = (*pts.first()?, *pts.last()?);
                let s = ScreenPoint::new(scales.x.map_abscissa(start.0)?, y.map(start.1));
                let e = ScreenPoint::new(scales.x.map_abscissa(end.0)?, y.map(end.1));
                if !s.is_finite() || !e.is_finite() {
                    return None;
                }
                let mut b = PathBuilder::new();
                b.move_to(s.x, s.y).line_to(e.x, e.y);
                Some(TrendSegment { group, start, end, screen_start: s, screen_end: e, path: b.finish() })
            })
            .collect();
        trace!(segments = segments.len(), "trend extensions");
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ProcessOptions, RawPoint};

    fn chart(records: &[RawPoint]) -> (LineChartState, ChartConfig) {
        let cfg = ChartConfig::default();
        let mut s = LineChartState::new(&cfg);
        s.set_data(records, &ProcessOptions::default(), &cfg);
        (s, cfg)
    }

    #[test]
    fn area_closes_on_zero_line() {
        let (s, cfg) = chart(&[
            RawPoint::new().with("x", 0).with("y", 10),
            RawPoint::new().with("x", 10).with("y", 20),
        ]);
        let g = LineGeometry::new(&s, &cfg);
        let area = &g.calculate_area_paths()["default"];
        assert!(area.starts_with("M0,340L0,"), "{area}");
        assert!(area.ends_with("L720,340Z"), "{area}");
    }

    #[test]
    fn hit_test_respects_threshold() {
        let (s, cfg) = chart(&[
            RawPoint::new().with("x", 0).with("y", 0),
            RawPoint::new().with("x", 10).with("y", 10),
        ]);
        let g = LineGeometry::new(&s, &cfg);
        let p = g.data_to_screen(&s.index().data()[1]).unwrap_or(ScreenPoint::new(0.0, 0.0));
        assert_eq!(g.find_data_at_position(p.x + 8.0, p.y).map(|(i, _)| i), Some(1));
        // Exactly dot_radius + HIT_SLOP away is outside.
        assert_eq!(g.find_data_at_position(p.x + 9.0, p.y), None);
        assert_eq!(g.find_data_at_position(p.x + 10.0, p.y), None);
        assert_eq!(g.find_nearest_data_point_by_x(p.x + 300.0).map(|(i, _)| i), Some(1));
    }
}
