// File: crates/barline-core/src/responsive.rs
// Summary: Responsive layout policy for bar charts plus a caller-clocked resize debouncer.
// Notes:
// - `compute_layout` is pure; `ResizeController` adds debouncing on top of it.
// - Time is always passed in by the caller so behavior is deterministic under test.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::geometry::clamp;
use crate::types::{Margins, Size};

/// Font sizes in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub tick: f64,
    pub label: f64,
    pub title: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self { tick: 12.0, label: 14.0, title: 16.0 }
    }
}

impl FontSizes {
    fn scaled(&self, factor: f64, floor: &FontSizes) -> Self {
        Self {
            tick: (self.tick * factor).max(floor.tick),
            label: (self.label * factor).max(floor.label),
            title: (self.title * factor).max(floor.title),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveConfig {
    pub enabled: bool,
    /// Container width at which the scale factor is 1.
    pub baseline_width: f64,
    pub max_scale: f64,
    /// Smallest automatic bar width before the chart overflows horizontally.
    pub min_bar_width: f64,
    pub max_auto_bar_width: f64,
    /// Share of a category slot left empty around its bar.
    pub padding_ratio: f64,
    pub debounce_ms: u64,
    pub fonts: FontSizes,
    pub min_fonts: FontSizes,
    pub min_margins: Margins,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            baseline_width: 800.0,
            max_scale: 1.5,
            min_bar_width: 20.0,
            max_auto_bar_width: 80.0,
            padding_ratio: 0.2,
            debounce_ms: 10,
            fonts: FontSizes::default(),
            min_fonts: FontSizes { tick: 9.0, label: 10.0, title: 12.0 },
            min_margins: Margins::new(10.0, 10.0, 25.0, 30.0),
        }
    }
}

/// Result of fitting a bar chart into a container.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponsiveLayout {
    pub scale: f64,
    pub bar_width: f64,
    /// Total chart width; wider than the container when `overflow` is set.
    pub chart_width: f64,
    pub chart_height: f64,
    pub overflow: bool,
    pub margins: Margins,
    pub fonts: FontSizes,
}

/// Fit `categories` bars into `container`.
///
/// A `pinned` width is honored as-is and only overflows when it does not fit
/// its slot. Otherwise the bar takes its share of the slot, clamped to
/// `[min_bar_width, max_auto_bar_width]`, and the chart widens instead of
/// shrinking bars below the minimum.
pub fn compute_layout(
    cfg: &ResponsiveConfig,
    container: Size,
    base_margins: &Margins,
    categories: usize,
    pinned: Option<f64>,
) -> ResponsiveLayout {
    let scale = if cfg.baseline_width > 0.0 && container.width.is_finite() {
        (container.width / cfg.baseline_width).clamp(0.0, cfg.max_scale.max(0.0))
    } else {
        1.0
    };
    let margins = base_margins.scaled(scale, &cfg.min_margins);
    let n = categories.max(1) as f64;
    let fill = 1.0 - clamp(cfg.padding_ratio, 0.0, 0.95);

    let available = (container.width - margins.hsum()).max(0.0);
    let slot = available / n;
    let share = slot * fill;

    let (bar_width, needed_slot, overflow) = match pinned.filter(|w| w.is_finite() && *w > 0.0) {
        Some(w) => {
            let needed = w / fill;
            (w, needed, needed > slot)
        }
        None => {
            let w = clamp(share, cfg.min_bar_width, cfg.max_auto_bar_width.max(cfg.min_bar_width));
            (w, cfg.min_bar_width / fill, share < cfg.min_bar_width)
        }
    };
    let chart_width = if overflow { needed_slot * n + margins.hsum() } else { container.width };

    let layout = ResponsiveLayout {
        scale,
        bar_width,
        chart_width,
        chart_height: container.height,
        overflow,
        margins,
        fonts: cfg.fonts.scaled(scale, &cfg.min_fonts),
    };
    debug!(
        container_width = container.width,
        categories,
        bar_width = layout.bar_width,
        overflow = layout.overflow,
        "computed responsive layout"
    );
    layout
}

/// Trailing-edge debouncer: only the last value notified within `delay` is released.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    /// Record `value` at `now`, replacing anything pending and restarting the timer.
    pub fn notify(&mut self, value: T, now: Instant) {
        self.pending = Some((now, value));
    }

    /// Release the pending value once `delay` has elapsed since the last notify.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if now.saturating_duration_since(*at) >= self.delay => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Debounced container-resize handling for one chart.
#[derive(Clone, Debug)]
pub struct ResizeController {
    config: ResponsiveConfig,
    debouncer: Debouncer<Size>,
    container: Option<Size>,
    last: Option<ResponsiveLayout>,
}

impl ResizeController {
    pub fn new(config: ResponsiveConfig) -> Self {
        let delay = Duration::from_millis(config.debounce_ms);
        Self { config, debouncer: Debouncer::new(delay), container: None, last: None }
    }

    pub fn config(&self) -> &ResponsiveConfig {
        &self.config
    }

    /// Swap the policy; a pending resize is kept.
    pub fn set_config(&mut self, config: ResponsiveConfig) {
        if config.debounce_ms != self.config.debounce_ms {
            self.debouncer.delay = Duration::from_millis(config.debounce_ms);
        }
        self.config = config;
    }

    pub fn on_resize(&mut self, container: Size, now: Instant) {
        trace!(width = container.width, height = container.height, "resize observed");
        self.debouncer.notify(container, now);
    }

    /// Layout for the settled container size, or `None` while the debounce
    /// window is open or when nothing changed.
    pub fn poll(
        &mut self,
        now: Instant,
        base_margins: &Margins,
        categories: usize,
        pinned: Option<f64>,
    ) -> Option<ResponsiveLayout> {
        let container = self.debouncer.poll(now)?;
        self.container = Some(container);
        self.update(container, base_margins, categories, pinned)
    }

    /// Recompute for the last settled container, e.g. after the category count changed.
    pub fn relayout(&mut self, base_margins: &Margins, categories: usize, pinned: Option<f64>) -> Option<ResponsiveLayout> {
        let container = self.container?;
        self.update(container, base_margins, categories, pinned)
    }

    fn update(
        &mut self,
        container: Size,
        base_margins: &Margins,
        categories: usize,
        pinned: Option<f64>,
    ) -> Option<ResponsiveLayout> {
        let layout = compute_layout(&self.config, container, base_margins, categories, pinned);
        if self.last.as_ref() == Some(&layout) {
            return None;
        }
        self.last = Some(layout.clone());
        Some(layout)
    }

    pub fn container(&self) -> Option<Size> {
        self.container
    }

    pub fn last_layout(&self) -> Option<&ResponsiveLayout> {
        self.last.as_ref()
    }

    /// Forget the last layout so the next settled resize is always reported.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debouncer_releases_only_the_last_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.notify(1, t0);
        d.notify(2, t0 + Duration::from_millis(5));
        assert_eq!(d.poll(t0 + Duration::from_millis(12)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(15)), Some(2));
        assert!(!d.is_pending());
    }

    #[test]
    fn scale_is_capped() {
        let cfg = ResponsiveConfig::default();
        let l = compute_layout(&cfg, Size::new(2400.0, 400.0), &Margins::default(), 4, None);
        assert_eq!(l.scale, 1.5);
        assert_eq!(l.fonts.tick, 18.0);
        assert_eq!(l.bar_width, 80.0);
        assert!(!l.overflow);
    }

    #[test]
    fn small_containers_floor_margins_and_fonts() {
        let cfg = ResponsiveConfig::default();
        let l = compute_layout(&cfg, Size::new(200.0, 300.0), &Margins::default(), 2, None);
        assert_eq!(l.scale, 0.25);
        assert_eq!(l.margins, Margins::new(10.0, 10.0, 25.0, 30.0));
        assert_eq!(l.fonts, FontSizes { tick: 9.0, label: 10.0, title: 12.0 });
    }
}
