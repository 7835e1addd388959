// File: crates/barline-core/src/chart.rs
// Summary: LineChart and BarChart facades: config layers, data updates, frames and pointer events.
// Notes:
// - `set_data` validates first; invalid input leaves the chart untouched.
// - Pointer coordinates are plot-area pixels (margins already subtracted).

use std::time::Instant;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::axis::Axes;
use crate::bar::{BarGeometry, BarPosition};
use crate::config::{ChartConfig, ConfigLayer, LayeredConfig};
use crate::data::{DataProcessor, ProcessOptions, RawPoint};
use crate::error::{Result, ValidationWarning};
use crate::event::{BarHit, ChartEvent, EventDispatcher, EventKind, HitTarget, PointHit, PointerTracker};
use crate::geometry::ScreenPoint;
use crate::ids::{element_id, ChartInstanceId, ElementKind};
use crate::legend::{layout_legend, legend_hit, LegendItem};
use crate::line::{DotPosition, LineGeometry};
use crate::responsive::{FontSizes, ResizeController, ResponsiveLayout};
use crate::scale::ScaleBundle;
use crate::state::{BarChartState, LineChartState};
use crate::trend::TrendSegment;
use crate::types::{Margins, Size};

/// Parts shared by both chart kinds.
struct ChartCore {
    id: ChartInstanceId,
    layers: LayeredConfig,
    config: ChartConfig,
    options: ProcessOptions,
    tracker: PointerTracker,
    events: EventDispatcher,
}

impl ChartCore {
    fn new(layers: LayeredConfig) -> Self {
        let config = layers.resolve();
        Self {
            id: ChartInstanceId::next(),
            layers,
            config,
            options: ProcessOptions::default(),
            tracker: PointerTracker::new(),
            events: EventDispatcher::new(),
        }
    }

    fn validate(raw: &Value) -> Result<(Vec<RawPoint>, Vec<ValidationWarning>)> {
        let warnings = DataProcessor::validate_data(raw).into_result()?;
        for w in &warnings {
            warn!(warning = %w, "data warning");
        }
        Ok((DataProcessor::records_from_json(raw), warnings))
    }

    fn validate_records(records: &[RawPoint]) -> Result<Vec<ValidationWarning>> {
        DataProcessor::validate_records(records).into_result()
    }

    fn update_config(&mut self, layer: &ConfigLayer) {
        self.layers.apply_user(layer);
        self.config = self.layers.resolve();
    }

    fn emit(&mut self, event: ChartEvent) -> ChartEvent {
        self.events.dispatch(&event);
        event
    }

    fn pointer_move(&mut self, hit: Option<HitTarget>, x: f64, y: f64) -> Vec<ChartEvent> {
        let events = self.tracker.pointer_move(hit, ScreenPoint::new(x, y));
        for e in &events {
            self.events.dispatch(e);
        }
        events
    }

    fn pointer_leave(&mut self) -> Option<ChartEvent> {
        let event = self.tracker.pointer_leave()?;
        Some(self.emit(event))
    }

    fn legend(&self, entries: Vec<crate::legend::LegendEntry>) -> Vec<LegendItem> {
        if !self.config.legend.show {
            return Vec::new();
        }
        layout_legend(&entries, self.config.inner_size().width, &self.config.legend)
    }
}

/// Everything a renderer needs to draw one line chart.
#[derive(Clone, Debug)]
pub struct LineFrame<'a> {
    pub size: Size,
    pub margins: Margins,
    pub scales: &'a ScaleBundle,
    pub lines: IndexMap<String, String>,
    pub areas: IndexMap<String, String>,
    pub dots: IndexMap<String, Vec<DotPosition<'a>>>,
    pub trends: Vec<TrendSegment>,
    pub axes: Axes,
    pub legend: Vec<LegendItem>,
    pub fonts: FontSizes,
}

pub struct LineChart {
    core: ChartCore,
    state: LineChartState,
}

impl LineChart {
    pub fn new(layers: LayeredConfig) -> Self {
        let core = ChartCore::new(layers);
        let state = LineChartState::new(&core.config);
        Self { core, state }
    }

    /// Replace the accessors, parser, filter and sort used on the next `set_data`.
    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.core.options = options;
        self
    }

    pub fn id(&self) -> ChartInstanceId {
        self.core.id
    }

    pub fn config(&self) -> &ChartConfig {
        &self.core.config
    }

    pub fn state(&self) -> &LineChartState {
        &self.state
    }

    pub fn geometry(&self) -> LineGeometry<'_> {
        LineGeometry::new(&self.state, &self.core.config)
    }

    /// Validate and load a JSON array of records.
    pub fn set_data(&mut self, raw: &Value) -> Result<Vec<ValidationWarning>> {
        let (records, warnings) = ChartCore::validate(raw)?;
        self.state.set_data(&records, &self.core.options, &self.core.config);
        Ok(warnings)
    }

    pub fn set_records(&mut self, records: &[RawPoint]) -> Result<Vec<ValidationWarning>> {
        let warnings = ChartCore::validate_records(records)?;
        self.state.set_data(records, &self.core.options, &self.core.config);
        Ok(warnings)
    }

    pub fn update_config(&mut self, layer: &ConfigLayer) {
        self.core.update_config(layer);
        self.state.rebuild_scales(&self.core.config);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.update_config(&ConfigLayer { width: Some(width), height: Some(height), ..Default::default() });
    }

    pub fn frame(&self) -> LineFrame<'_> {
        let cfg = &self.core.config;
        let g = self.geometry();
        LineFrame {
            size: cfg.size(),
            margins: cfg.margins,
            scales: self.state.scales(),
            lines: g.calculate_line_paths(),
            areas: if cfg.show_area { g.calculate_area_paths() } else { IndexMap::new() },
            dots: if cfg.show_dots { g.calculate_dot_positions() } else { IndexMap::new() },
            trends: g.calculate_trend_extensions(),
            axes: g.calculate_axes(),
            legend: self.core.legend(g.legend_entries()),
            fonts: cfg.responsive.fonts,
        }
    }

    pub fn on_event(&mut self, kind: Option<EventKind>, listener: impl FnMut(&ChartEvent) + 'static) {
        self.core.events.on(kind, listener);
    }

    fn hit(&self, x: f64, y: f64) -> Option<HitTarget> {
        let g = self.geometry();
        let (index, p) = g.find_data_at_position(x, y)?;
        Some(HitTarget::Point(PointHit {
            index,
            group: p.group.clone(),
            x: p.x.clone(),
            y: p.y,
            screen: g.data_to_screen(p)?,
        }))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<ChartEvent> {
        let hit = self.hit(x, y);
        self.core.pointer_move(hit, x, y)
    }

    pub fn pointer_leave(&mut self) -> Option<ChartEvent> {
        self.core.pointer_leave()
    }

    pub fn click(&mut self, x: f64, y: f64) -> Option<ChartEvent> {
        let target = self.hit(x, y)?;
        Some(self.core.emit(ChartEvent::Click { target, pointer: ScreenPoint::new(x, y) }))
    }

    pub fn toggle_group(&mut self, group: &str) -> Option<ChartEvent> {
        let visible = self.state.toggle_group(group, &self.core.config)?;
        debug!(group, visible, "legend toggle");
        Some(self.core.emit(ChartEvent::LegendToggle { group: group.to_string(), visible }))
    }

    /// Toggle the legend entry under `(x, y)` in legend coordinates.
    pub fn legend_click(&mut self, x: f64, y: f64) -> Option<ChartEvent> {
        let group = legend_hit(&self.frame().legend, x, y)?.entry.group.clone();
        self.toggle_group(&group)
    }

    pub fn element_id(&self, kind: ElementKind, group: &str) -> String {
        element_id(self.core.id, kind, group)
    }
}

/// Everything a renderer needs to draw one bar chart.
#[derive(Clone, Debug)]
pub struct BarFrame<'a> {
    pub size: Size,
    pub margins: Margins,
    pub scales: &'a ScaleBundle,
    pub bars: IndexMap<String, Vec<BarPosition<'a>>>,
    pub axes: Axes,
    pub legend: Vec<LegendItem>,
    pub fonts: FontSizes,
    /// Set when the chart is wider than its container and needs scrolling.
    pub overflow: bool,
}

pub struct BarChart {
    core: ChartCore,
    state: BarChartState,
    resize: ResizeController,
}

impl BarChart {
    pub fn new(layers: LayeredConfig) -> Self {
        let core = ChartCore::new(layers);
        let state = BarChartState::new(&core.config);
        let resize = ResizeController::new(core.config.responsive.clone());
        Self { core, state, resize }
    }

    pub fn with_options(mut self, options: ProcessOptions) -> Self {
        self.core.options = options;
        self
    }

    pub fn id(&self) -> ChartInstanceId {
        self.core.id
    }

    pub fn config(&self) -> &ChartConfig {
        &self.core.config
    }

    pub fn state(&self) -> &BarChartState {
        &self.state
    }

    pub fn geometry(&self) -> BarGeometry<'_> {
        BarGeometry::new(&self.state, &self.core.config)
    }

    pub fn set_data(&mut self, raw: &Value) -> Result<Vec<ValidationWarning>> {
        let (records, warnings) = ChartCore::validate(raw)?;
        self.state.set_data(&records, &self.core.options, &self.core.config);
        self.relayout();
        Ok(warnings)
    }

    pub fn set_records(&mut self, records: &[RawPoint]) -> Result<Vec<ValidationWarning>> {
        let warnings = ChartCore::validate_records(records)?;
        self.state.set_data(records, &self.core.options, &self.core.config);
        self.relayout();
        Ok(warnings)
    }

    pub fn update_config(&mut self, layer: &ConfigLayer) {
        self.core.update_config(layer);
        self.resize.set_config(self.core.config.responsive.clone());
        self.state.rebuild_scales(&self.core.config);
        self.relayout();
    }

    /// Fixed-size resize without the responsive policy.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.update_config(&ConfigLayer { width: Some(width), height: Some(height), ..Default::default() });
    }

    /// Record a container size change; it takes effect on a later [`BarChart::poll_resize`].
    pub fn observe_container(&mut self, container: Size, now: Instant) {
        self.resize.on_resize(container, now);
    }

    /// Apply the debounced container size, if it has settled and changed the layout.
    pub fn poll_resize(&mut self, now: Instant) -> Option<ResponsiveLayout> {
        if !self.core.config.responsive.enabled {
            return None;
        }
        let declared = self.core.layers.resolve_declared();
        let layout = self.resize.poll(now, &declared.margins, self.state.category_count(), declared.bar_width)?;
        self.apply_layout(&layout);
        Some(layout)
    }

    pub fn layout(&self) -> Option<&ResponsiveLayout> {
        self.resize.last_layout()
    }

    fn relayout(&mut self) {
        if !self.core.config.responsive.enabled {
            return;
        }
        let declared = self.core.layers.resolve_declared();
        if let Some(layout) = self.resize.relayout(&declared.margins, self.state.category_count(), declared.bar_width) {
            self.apply_layout(&layout);
        }
    }

    fn apply_layout(&mut self, layout: &ResponsiveLayout) {
        self.core.layers.set_runtime(ConfigLayer {
            width: Some(layout.chart_width),
            height: Some(layout.chart_height),
            margins: Some(layout.margins),
            bar_width: Some(layout.bar_width),
            ..Default::default()
        });
        self.core.config = self.core.layers.resolve();
        self.state.rebuild_scales(&self.core.config);
    }

    pub fn frame(&self) -> BarFrame<'_> {
        let cfg = &self.core.config;
        let g = self.geometry();
        let layout = self.resize.last_layout().filter(|_| cfg.responsive.enabled);
        BarFrame {
            size: cfg.size(),
            margins: cfg.margins,
            scales: self.state.scales(),
            bars: g.calculate_bar_positions(),
            axes: g.calculate_axes(),
            legend: self.core.legend(g.legend_entries()),
            fonts: layout.map_or(cfg.responsive.fonts, |l| l.fonts),
            overflow: layout.is_some_and(|l| l.overflow),
        }
    }

    pub fn on_event(&mut self, kind: Option<EventKind>, listener: impl FnMut(&ChartEvent) + 'static) {
        self.core.events.on(kind, listener);
    }

    fn hit(&self, x: f64, y: f64) -> Option<HitTarget> {
        let bar = self.geometry().find_bar_at_position(x, y)?;
        Some(HitTarget::Bar(BarHit {
            index: bar.index,
            group: bar.group,
            category: bar.category,
            value: bar.value,
            y0: bar.y0,
            y1: bar.y1,
            rect: bar.rect,
        }))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<ChartEvent> {
        let hit = self.hit(x, y);
        self.core.pointer_move(hit, x, y)
    }

    pub fn pointer_leave(&mut self) -> Option<ChartEvent> {
        self.core.pointer_leave()
    }

    pub fn click(&mut self, x: f64, y: f64) -> Option<ChartEvent> {
        let target = self.hit(x, y)?;
        Some(self.core.emit(ChartEvent::Click { target, pointer: ScreenPoint::new(x, y) }))
    }

    pub fn toggle_group(&mut self, group: &str) -> Option<ChartEvent> {
        let visible = self.state.toggle_group(group, &self.core.config)?;
        debug!(group, visible, "legend toggle");
        Some(self.core.emit(ChartEvent::LegendToggle { group: group.to_string(), visible }))
    }

    pub fn legend_click(&mut self, x: f64, y: f64) -> Option<ChartEvent> {
        let group = legend_hit(&self.frame().legend, x, y)?.entry.group.clone();
        self.toggle_group(&group)
    }

    pub fn element_id(&self, kind: ElementKind, group: &str) -> String {
        element_id(self.core.id, kind, group)
    }
}
