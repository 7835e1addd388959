// File: crates/barline-core/src/state.rs
// Summary: Chart state for line and bar charts: processed data, per-group and
//          per-category indexes, legend visibility, and the cached scales.
// Notes:
// - Indexes store positions into `data`; they are rebuilt together on every `set_data`.
// - Bar value lookups use the first point for a (category, group) pair; later
//   duplicates are ignored everywhere so stacks and domains agree.

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, info};

use crate::config::{BarMode, ChartConfig, ChartKind};
use crate::data::{DataProcessor, ProcessOptions, ProcessedPoint, RawPoint};
use crate::scale::{
    detect_scale_type, OrdinalLayout, ScaleBundle, ScaleManager, ScaleOptions, ScaleType, DAY_MILLIS,
};
use crate::trend::{Indicator, TrendExtension};

/// Processed data grouped by series, with legend visibility.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesIndex {
    data: Vec<ProcessedPoint>,
    grouped: IndexMap<String, Vec<usize>>,
    hidden: IndexSet<String>,
}

impl SeriesIndex {
    /// Index `data`, keeping hidden flags only for groups that still exist.
    pub fn build(data: Vec<ProcessedPoint>, previously_hidden: &IndexSet<String>) -> Self {
        let mut grouped: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (i, p) in data.iter().enumerate() {
            grouped.entry(p.group.clone()).or_default().push(i);
        }
        let hidden = previously_hidden.iter().filter(|g| grouped.contains_key(*g)).cloned().collect();
        Self { data, grouped, hidden }
    }

    pub fn data(&self) -> &[ProcessedPoint] {
        &self.data
    }

    pub fn point(&self, index: usize) -> Option<&ProcessedPoint> {
        self.data.get(index)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Group names in first-seen order.
    pub fn groups(&self) -> Vec<String> {
        self.grouped.keys().cloned().collect()
    }

    pub fn group_indices(&self, group: &str) -> &[usize] {
        self.grouped.get(group).map_or(&[], Vec::as_slice)
    }

    pub fn group_points<'a>(&'a self, group: &str) -> impl Iterator<Item = &'a ProcessedPoint> + 'a {
        self.group_indices(group).iter().map(move |&i| &self.data[i])
    }

    pub fn is_visible(&self, group: &str) -> bool {
        self.grouped.contains_key(group) && !self.hidden.contains(group)
    }

    /// Visible groups in first-seen order.
    pub fn visible_groups(&self) -> Vec<&str> {
        self.grouped.keys().map(String::as_str).filter(|g| !self.hidden.contains(*g)).collect()
    }

    pub fn visible_points(&self) -> Vec<&ProcessedPoint> {
        self.data.iter().filter(|p| !self.hidden.contains(&p.group)).collect()
    }

    pub fn hidden(&self) -> &IndexSet<String> {
        &self.hidden
    }

    /// Flip a group's visibility; returns the new state, or `None` for an unknown group.
    pub fn toggle_group(&mut self, group: &str) -> Option<bool> {
        if !self.grouped.contains_key(group) {
            return None;
        }
        if self.hidden.shift_remove(group) {
            Some(true)
        } else {
            self.hidden.insert(group.to_string());
            Some(false)
        }
    }

    pub fn set_group_visible(&mut self, group: &str, visible: bool) -> bool {
        if !self.grouped.contains_key(group) {
            return false;
        }
        if visible {
            self.hidden.shift_remove(group);
        } else {
            self.hidden.insert(group.to_string());
        }
        true
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }
}

fn resolve_scale_type(config: &ChartConfig, data: &[ProcessedPoint]) -> ScaleType {
    config.x_scale_type.unwrap_or_else(|| detect_scale_type(data))
}

// ---- line -------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct LineChartState {
    index: SeriesIndex,
    scale_type: ScaleType,
    scales: ScaleBundle,
}

impl LineChartState {
    pub fn new(config: &ChartConfig) -> Self {
        let mut s = Self {
            index: SeriesIndex::default(),
            scale_type: ScaleType::Ordinal,
            scales: empty_scales(config, ChartKind::Line),
        };
        s.rebuild_scales(config);
        s
    }

    pub fn set_data(&mut self, raw: &[RawPoint], options: &ProcessOptions, config: &ChartConfig) {
        let processed = DataProcessor::process(raw, options);
        self.set_processed(processed, config);
    }

    /// Replace the data with already processed points.
    pub fn set_processed(&mut self, data: Vec<ProcessedPoint>, config: &ChartConfig) {
        self.index = SeriesIndex::build(data, self.index.hidden());
        self.rebuild_scales(config);
        info!(points = self.index.len(), groups = self.index.grouped.len(), scale = ?self.scale_type, "line data set");
    }

    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    pub fn scales(&self) -> &ScaleBundle {
        &self.scales
    }

    pub fn toggle_group(&mut self, group: &str, config: &ChartConfig) -> Option<bool> {
        let visible = self.index.toggle_group(group)?;
        self.rebuild_scales(config);
        Some(visible)
    }

    /// Trend projection endpoints per visible group, as (group, [(abscissa, y); 2]).
    pub fn trend_projections(&self, config: &ChartConfig) -> Vec<(String, Vec<(f64, f64)>)> {
        if !config.trend.enabled || self.scale_type == ScaleType::Ordinal {
            return Vec::new();
        }
        let horizon = match self.scale_type {
            ScaleType::Time => config.trend.projection_days * DAY_MILLIS,
            _ => config.trend.projection_days,
        };
        let indicator = TrendExtension { window: config.trend.window, horizon };
        let x_scale = &self.scales.x;
        self.index
            .visible_groups()
            .into_iter()
            .filter_map(|g| {
                let series: Vec<(f64, f64)> =
                    self.index.group_points(g).filter_map(|p| Some((x_scale.abscissa(p)?, p.y))).collect();
                let projected = indicator.compute(&series);
                (!projected.is_empty()).then(|| (g.to_string(), projected))
            })
            .collect()
    }

    pub fn rebuild_scales(&mut self, config: &ChartConfig) {
        self.scale_type = resolve_scale_type(config, self.index.data());
        // Abscissas depend only on the x scale variant, so the unextended
        // scales are enough to project trends.
        self.scales = self.build_scales(config, None);
        let extend_to = self
            .trend_projections(config)
            .iter()
            .filter_map(|(_, seg)| seg.last().map(|p| p.0))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
        if extend_to.is_some() {
            self.scales = self.build_scales(config, extend_to);
        }
    }

    fn build_scales(&self, config: &ChartConfig, x_extend_to: Option<f64>) -> ScaleBundle {
        let inner = config.inner_size();
        let visible = self.index.visible_points();
        let groups = self.index.groups();
        let palette = config.palette_for(ChartKind::Line);
        let y_ticks = config.y_ticks.unwrap_or(5);
        ScaleManager::create_scales(&ScaleOptions {
            data: self.index.data(),
            value_data: &visible,
            groups: &groups,
            scale_type: self.scale_type,
            inner_width: inner.width,
            inner_height: inner.height,
            value_extent: None,
            nice: config.nice,
            value_ticks: y_ticks,
            palette: &palette,
            ordinal: OrdinalLayout::Point { padding: 0.5 },
            orientation: crate::types::Orientation::Vertical,
            x_extend_to,
            ordinal_keys: None,
        })
    }
}

// ---- bar --------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct BarChartState {
    index: SeriesIndex,
    /// Category key → data positions, categories sorted by `compare_categories`.
    categories: IndexMap<String, Vec<usize>>,
    scale_type: ScaleType,
    scales: ScaleBundle,
}

impl BarChartState {
    pub fn new(config: &ChartConfig) -> Self {
        let mut s = Self {
            index: SeriesIndex::default(),
            categories: IndexMap::new(),
            scale_type: ScaleType::Ordinal,
            scales: empty_scales(config, ChartKind::Bar),
        };
        s.rebuild_scales(config);
        s
    }

    pub fn set_data(&mut self, raw: &[RawPoint], options: &ProcessOptions, config: &ChartConfig) {
        let processed = DataProcessor::process(raw, options);
        self.set_processed(processed, config);
    }

    pub fn set_processed(&mut self, data: Vec<ProcessedPoint>, config: &ChartConfig) {
        self.index = SeriesIndex::build(data, self.index.hidden());
        self.categories = IndexMap::new();
        for (i, p) in self.index.data().iter().enumerate() {
            if p.x.is_missing() {
                continue;
            }
            self.categories.entry(p.category()).or_default().push(i);
        }
        let data = self.index.data();
        self.categories.sort_by(|_, a, _, b| compare_categories(&data[a[0]], &data[b[0]]));
        self.rebuild_scales(config);
        info!(
            points = self.index.len(),
            categories = self.categories.len(),
            groups = self.index.grouped.len(),
            "bar data set"
        );
    }

    pub fn index(&self) -> &SeriesIndex {
        &self.index
    }

    /// Detected (or configured) type of the category values.
    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    pub fn scales(&self) -> &ScaleBundle {
        &self.scales
    }

    /// Category keys in sorted order; band order on the category axis matches.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn category_data(&self, category: &str) -> impl Iterator<Item = &ProcessedPoint> {
        self.categories.get(category).into_iter().flatten().map(move |&i| &self.index.data()[i])
    }

    /// First point for `(category, group)`, with its data position.
    pub fn first_match(&self, category: &str, group: &str) -> Option<(usize, &ProcessedPoint)> {
        self.categories
            .get(category)?
            .iter()
            .map(|&i| (i, &self.index.data()[i]))
            .find(|(_, p)| p.group == group)
    }

    pub fn value_for(&self, category: &str, group: &str) -> Option<f64> {
        self.first_match(category, group).map(|(_, p)| p.y)
    }

    /// `(min(0, most negative stack), max(0, tallest stack))` over visible groups.
    pub fn stacked_extent(&self) -> (f64, f64) {
        let visible = self.index.visible_groups();
        self.categories.keys().fold((0.0_f64, 0.0_f64), |(lo, hi), cat| {
            let (neg, pos) = visible.iter().filter_map(|g| self.value_for(cat, g)).fold((0.0, 0.0), |(n, p), v| {
                if v < 0.0 { (n + v, p) } else { (n, p + v) }
            });
            (lo.min(neg), hi.max(pos))
        })
    }

    /// Raw value extent for a layout mode, before padding.
    pub fn value_extent(&self, mode: BarMode) -> (f64, f64) {
        match mode {
            BarMode::Stacked => self.stacked_extent(),
            BarMode::Single | BarMode::Grouped => {
                let visible = self.index.visible_groups();
                let values = self
                    .categories
                    .keys()
                    .flat_map(|cat| visible.iter().filter_map(move |g| self.value_for(cat, g)));
                let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
                if lo.is_finite() { (lo.min(0.0), hi) } else { (0.0, 0.0) }
            }
        }
    }

    pub fn toggle_group(&mut self, group: &str, config: &ChartConfig) -> Option<bool> {
        let visible = self.index.toggle_group(group)?;
        self.rebuild_scales(config);
        Some(visible)
    }

    pub fn rebuild_scales(&mut self, config: &ChartConfig) {
        self.scale_type = resolve_scale_type(config, self.index.data());
        let inner = config.inner_size();
        let groups = self.index.groups();
        let palette = config.palette_for(ChartKind::Bar);
        let extent = self.value_extent(config.bar_mode());
        let keys: Vec<String> = self.categories.keys().cloned().collect();
        let horizontal = config.orientation == crate::types::Orientation::Horizontal;
        let ticks = config
            .y_ticks
            .unwrap_or_else(|| crate::axis::bar_value_ticks(horizontal, inner.width, inner.height));
        self.scales = ScaleManager::create_scales(&ScaleOptions {
            data: self.index.data(),
            value_data: &[],
            groups: &groups,
            scale_type: ScaleType::Ordinal,
            inner_width: inner.width,
            inner_height: inner.height,
            value_extent: Some(extent),
            nice: config.nice,
            value_ticks: ticks,
            palette: &palette,
            ordinal: OrdinalLayout::Band { inner: 0.0, outer: 0.0 },
            orientation: config.orientation,
            x_extend_to: None,
            ordinal_keys: Some(&keys),
        });
        debug!(mode = ?config.bar_mode(), lo = extent.0, hi = extent.1, "bar value extent");
    }
}

fn empty_scales(config: &ChartConfig, kind: ChartKind) -> ScaleBundle {
    let inner = config.inner_size();
    let palette = config.palette_for(kind);
    ScaleManager::create_scales(&ScaleOptions {
        data: &[],
        value_data: &[],
        groups: &[],
        scale_type: ScaleType::Ordinal,
        inner_width: inner.width,
        inner_height: inner.height,
        value_extent: Some((0.0, 0.0)),
        nice: false,
        value_ticks: 5,
        palette: &palette,
        ordinal: OrdinalLayout::Point { padding: 0.5 },
        orientation: config.orientation,
        x_extend_to: None,
        ordinal_keys: None,
    })
}

/// Numbers first in numeric order, then real dates in time order, then text lexically.
fn compare_categories(a: &ProcessedPoint, b: &ProcessedPoint) -> Ordering {
    fn rank(p: &ProcessedPoint) -> u8 {
        if p.x.as_number().is_some() {
            0
        } else if p.has_time() {
            1
        } else {
            2
        }
    }
    rank(a).cmp(&rank(b)).then_with(|| match (a.x.as_number(), b.x.as_number()) {
        (Some(l), Some(r)) => l.total_cmp(&r),
        _ if a.has_time() && b.has_time() => a.parsed_date.cmp(&b.parsed_date),
        _ => a.category().cmp(&b.category()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(x: &str, y: f64, g: &str) -> RawPoint {
        RawPoint::new().with("x", x).with("y", y).with("group", g)
    }

    #[test]
    fn hidden_groups_survive_reload_when_still_present() {
        let cfg = ChartConfig::default();
        let mut s = LineChartState::new(&cfg);
        let opts = ProcessOptions::default();
        s.set_data(&[rec("a", 1.0, "g1"), rec("b", 2.0, "g2")], &opts, &cfg);
        assert_eq!(s.toggle_group("g2", &cfg), Some(false));
        s.set_data(&[rec("a", 1.0, "g2"), rec("b", 2.0, "g3")], &opts, &cfg);
        assert!(!s.index().is_visible("g2"));
        assert!(s.index().is_visible("g3"));
        assert_eq!(s.index().visible_groups(), ["g3"]);
    }

    #[test]
    fn first_match_ignores_duplicates() {
        let cfg = ChartConfig::default();
        let mut s = BarChartState::new(&cfg);
        s.set_data(
            &[rec("Jan", 5.0, "a"), rec("Jan", 99.0, "a"), rec("Jan", 3.0, "b")],
            &ProcessOptions::default().unsorted(),
            &cfg,
        );
        assert_eq!(s.value_for("Jan", "a"), Some(5.0));
        assert_eq!(s.stacked_extent(), (0.0, 8.0));
        assert_eq!(s.category_data("Jan").count(), 3);
    }
}
