// File: crates/barline-core/tests/responsive.rs
// Purpose: Responsive bar layout through the chart facade: debounced resizes, overflow and pinned widths.

use std::time::{Duration, Instant};

use barline_core::{BarChart, ConfigLayer, LayeredConfig, Size};
use serde_json::{json, Value};

fn months(n: usize) -> Value {
    Value::Array((0..n).map(|i| json!({ "x": format!("M{i:02}"), "y": (i as f64) * 3.0 + 10.0 })).collect())
}

fn ms(t: Instant, n: u64) -> Instant {
    t + Duration::from_millis(n)
}

#[test]
fn shrinking_switches_to_overflow_at_minimum_width() {
    let mut chart = BarChart::new(LayeredConfig::new());
    chart.set_data(&months(12)).expect("valid data");
    let t0 = Instant::now();

    chart.observe_container(Size::new(1600.0, 400.0), t0);
    let wide = chart.poll_resize(ms(t0, 20)).expect("layout");
    assert!(!wide.overflow);
    assert_eq!(wide.scale, 1.5);
    assert_eq!(wide.bar_width, 80.0);
    assert_eq!(chart.config().width, 1600.0);

    chart.observe_container(Size::new(300.0, 400.0), ms(t0, 30));
    let narrow = chart.poll_resize(ms(t0, 50)).expect("layout");
    assert!(narrow.overflow);
    assert_eq!(narrow.bar_width, 20.0);
    // 12 slots of 20 / 0.8 plus scaled margins (left 30 floor, right 11.25).
    assert!((narrow.chart_width - 341.25).abs() < 1e-9, "{}", narrow.chart_width);
    assert!(narrow.chart_width > 300.0);

    let frame = chart.frame();
    assert!(frame.overflow);
    assert_eq!(frame.size.width, narrow.chart_width);
    assert!(frame.bars["default"].iter().all(|b| (b.rect.width - 20.0).abs() < 1e-9));
    assert_eq!(frame.fonts.tick, 9.0);
    // Resolved config carries the computed width; nothing was declared.
    assert_eq!(chart.config().bar_width, Some(20.0));
    assert!(frame.bars["default"].len() == 12);
}

#[test]
fn resize_is_debounced_to_the_last_size() {
    let mut chart = BarChart::new(LayeredConfig::new());
    chart.set_data(&months(4)).expect("valid data");
    let t0 = Instant::now();

    chart.observe_container(Size::new(500.0, 300.0), t0);
    chart.observe_container(Size::new(900.0, 300.0), ms(t0, 5));
    assert!(chart.poll_resize(ms(t0, 12)).is_none());
    let layout = chart.poll_resize(ms(t0, 16)).expect("layout");
    assert_eq!(layout.chart_width, 900.0);
    assert_eq!(chart.config().height, 300.0);

    // Same container again: nothing to report.
    chart.observe_container(Size::new(900.0, 300.0), ms(t0, 30));
    assert!(chart.poll_resize(ms(t0, 45)).is_none());
}

#[test]
fn pinned_width_overflows_only_when_it_does_not_fit() {
    let layers = LayeredConfig::new().with_user(ConfigLayer { bar_width: Some(30.0), ..Default::default() });
    let mut chart = BarChart::new(layers);
    chart.set_data(&months(12)).expect("valid data");
    let t0 = Instant::now();

    chart.observe_container(Size::new(1200.0, 400.0), t0);
    let roomy = chart.poll_resize(ms(t0, 20)).expect("layout");
    assert_eq!((roomy.bar_width, roomy.overflow), (30.0, false));

    chart.observe_container(Size::new(300.0, 400.0), ms(t0, 40));
    let tight = chart.poll_resize(ms(t0, 60)).expect("layout");
    assert!(tight.overflow);
    assert_eq!(tight.bar_width, 30.0);
    assert!((tight.chart_width - (37.5 * 12.0 + 41.25)).abs() < 1e-9);
}

#[test]
fn new_data_relayouts_against_the_settled_container() {
    let mut chart = BarChart::new(LayeredConfig::new());
    chart.set_data(&months(12)).expect("valid data");
    let t0 = Instant::now();
    chart.observe_container(Size::new(300.0, 400.0), t0);
    assert!(chart.poll_resize(ms(t0, 20)).expect("layout").overflow);

    chart.set_data(&months(3)).expect("valid data");
    let layout = chart.layout().expect("layout");
    assert!(!layout.overflow);
    assert!((layout.bar_width - 69.0).abs() < 1e-9, "{}", layout.bar_width);
    assert_eq!(chart.config().width, 300.0);
}

#[test]
fn disabled_policy_ignores_container() {
    let layers = LayeredConfig::new().with_user(ConfigLayer {
        responsive: Some(barline_core::ResponsiveConfig { enabled: false, ..Default::default() }),
        ..Default::default()
    });
    let mut chart = BarChart::new(layers);
    chart.set_data(&months(12)).expect("valid data");
    let t0 = Instant::now();
    chart.observe_container(Size::new(300.0, 400.0), t0);
    assert!(chart.poll_resize(ms(t0, 50)).is_none());
    assert!(!chart.frame().overflow);
    assert_eq!(chart.config().width, 800.0);
}
