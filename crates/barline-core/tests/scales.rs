// File: crates/barline-core/tests/scales.rs
// Purpose: Scale-type detection, value-domain padding and scale construction from chart state.

use barline_core::data::{DataProcessor, ProcessOptions};
use barline_core::scale::{detect_scale_type, Scale};
use barline_core::{ChartConfig, ConfigLayer, LayeredConfig, LineChart, ScaleType};
use serde_json::{json, Value};

fn detect(v: Value) -> ScaleType {
    let raw = DataProcessor::records_from_json(&v);
    detect_scale_type(&DataProcessor::process(&raw, &ProcessOptions::default()))
}

#[test]
fn detection_priority() {
    assert_eq!(detect(json!([{ "x": 1, "y": 1 }, { "x": 2, "y": 2 }])), ScaleType::Linear);
    assert_eq!(detect(json!([{ "x": "2024-01-01", "y": 1 }])), ScaleType::Time);
    assert_eq!(detect(json!([{ "x": "A", "y": 1 }])), ScaleType::Ordinal);
    // One real date is enough once the numeric check fails.
    assert_eq!(detect(json!([{ "x": "A", "y": 1 }, { "x": "2024-05-01", "y": 2 }])), ScaleType::Time);
    assert_eq!(detect(json!([])), ScaleType::Ordinal);
}

#[test]
fn y_domain_is_padded_around_data() {
    let layers = LayeredConfig::new().with_user(ConfigLayer { nice: Some(false), ..Default::default() });
    let mut chart = LineChart::new(layers);
    let data: Vec<Value> =
        [100, 80, -3, 125, 60, 90].iter().enumerate().map(|(i, y)| json!({ "x": i, "y": y })).collect();
    chart.set_data(&Value::Array(data)).expect("valid data");

    let y = chart.state().scales().y.as_linear().expect("linear y").domain();
    assert!(y.0 < -3.0 && y.0 > -20.0, "{y:?}");
    assert!(y.1 > 125.0 && y.1 < 140.0, "{y:?}");
}

#[test]
fn nice_domain_contains_padded_extent() {
    let mut chart = LineChart::new(LayeredConfig::new());
    chart
        .set_data(&json!([{ "x": 0, "y": 100 }, { "x": 1, "y": -3 }, { "x": 2, "y": 125 }]))
        .expect("valid data");
    let (lo, hi) = chart.state().scales().y.as_linear().expect("linear y").domain();
    assert_eq!((lo, hi), (-50.0, 150.0));
}

#[test]
fn forced_scale_type_overrides_detection() {
    let layers = LayeredConfig::new().with_user(ConfigLayer { x_scale_type: Some(ScaleType::Ordinal), ..Default::default() });
    let mut chart = LineChart::new(layers);
    chart.set_data(&json!([{ "x": 1, "y": 1 }, { "x": 2, "y": 2 }])).expect("valid data");
    assert_eq!(chart.state().scale_type(), ScaleType::Ordinal);
    let Scale::Ordinal(band) = &chart.state().scales().x else { panic!("expected ordinal x") };
    assert_eq!(band.domain().collect::<Vec<_>>(), ["1", "2"]);
}

#[test]
fn empty_chart_has_usable_scales() {
    let chart = LineChart::new(LayeredConfig::new());
    let scales = chart.state().scales();
    let cfg = ChartConfig::default();
    assert_eq!(scales.inner_width, cfg.inner_size().width);
    assert_eq!(scales.y.as_linear().map(|s| s.domain()), Some((0.0, 1.0)));
    assert!(chart.geometry().calculate_line_paths().is_empty());
}
