// File: crates/barline-core/tests/config_presets.rs
// Purpose: Preset overlays, user layers from TOML/JSON, and per-chart-type palettes.

use barline_core::palette::{default_palette, presets};
use barline_core::{BarChart, ChartError, ChartKind, ConfigLayer, CurveType, LayeredConfig, LineChart, Rgba};
use serde_json::json;

#[test]
fn preset_then_user_layer() {
    let layers = LayeredConfig::new()
        .with_preset("Presentation")
        .expect("known preset")
        .with_user(ConfigLayer { width: Some(900.0), ..Default::default() });
    let cfg = layers.resolve();
    assert_eq!(cfg.width, 900.0);
    assert_eq!(cfg.height, 600.0);
    assert_eq!(cfg.curve, CurveType::Monotone);
}

#[test]
fn every_builtin_preset_resolves() {
    for p in presets() {
        let cfg = LayeredConfig::new().with_preset(p.name).expect("known preset").resolve();
        assert!(cfg.width > 0.0 && cfg.height > 0.0, "{}", p.name);
    }
}

#[test]
fn unknown_preset_is_an_error() {
    let err = LayeredConfig::new().with_preset("neon").unwrap_err();
    assert!(matches!(err, ChartError::UnknownPreset(ref n) if n == "neon"));
}

#[test]
fn toml_layer_fills_nested_defaults() {
    let layer = ConfigLayer::from_toml_str(
        r##"
        stacked = true
        palette = ["#ff0000", "#00ff00"]

        [trend]
        enabled = true

        [margins]
        top = 5.0
        right = 5.0
        bottom = 5.0
        left = 5.0
        "##,
    )
    .expect("valid toml");
    let cfg = LayeredConfig::new().with_user(layer).resolve();
    assert!(cfg.stacked);
    assert!(cfg.trend.enabled);
    assert_eq!(cfg.trend.window, 5);
    assert_eq!(cfg.margins.left, 5.0);
    assert_eq!(cfg.palette, Some(vec![Rgba::rgb(255, 0, 0), Rgba::rgb(0, 255, 0)]));
}

#[test]
fn json_layer_and_bad_values() {
    let layer = ConfigLayer::from_json_str(r#"{ "orientation": "horizontal", "y_ticks": 3 }"#).expect("valid json");
    assert_eq!(layer.y_ticks, Some(3));
    assert!(matches!(ConfigLayer::from_json_str(r#"{ "palette": ["nope"] }"#), Err(ChartError::Json(_))));
    assert!(matches!(ConfigLayer::from_toml_str("width = \"wide\""), Err(ChartError::Config(_))));
}

#[test]
fn chart_types_use_their_own_palettes() {
    let data = json!([{ "x": "a", "y": 1, "group": "first" }]);
    let mut line = LineChart::new(LayeredConfig::new());
    let mut bar = BarChart::new(LayeredConfig::new());
    line.set_data(&data).expect("valid data");
    bar.set_data(&data).expect("valid data");

    assert_eq!(line.state().scales().color.color("first"), default_palette(ChartKind::Line)[0]);
    assert_eq!(bar.state().scales().color.color("first"), default_palette(ChartKind::Bar)[0]);

    bar.update_config(&ConfigLayer { palette: Some(vec![Rgba::rgb(1, 2, 3)]), ..Default::default() });
    assert_eq!(bar.state().scales().color.color("first"), Rgba::rgb(1, 2, 3));
}
