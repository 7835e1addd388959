// File: crates/barline-core/tests/bar_layout.rs
// Purpose: Single, grouped and stacked bar layouts, the first-match rule, and bar hit testing.

use barline_core::{BarChart, BarMode, ConfigLayer, LayeredConfig, Orientation};
use serde_json::{json, Value};

fn devices() -> Value {
    json!([
        { "x": "Jan", "y": 52, "group": "Desktop" },
        { "x": "Jan", "y": 34, "group": "Mobile" },
        { "x": "Jan", "y": 120, "group": "Tablet" },
        { "x": "Feb", "y": 48, "group": "Desktop" },
        { "x": "Feb", "y": 40, "group": "Mobile" },
        { "x": "Feb", "y": 95, "group": "Tablet" }
    ])
}

fn chart(layer: ConfigLayer, data: &Value) -> BarChart {
    let mut c = BarChart::new(LayeredConfig::new().with_user(layer));
    c.set_data(data).expect("valid data");
    c
}

#[test]
fn stacked_segments_are_contiguous() {
    let c = chart(ConfigLayer { stacked: Some(true), ..Default::default() }, &devices());
    assert_eq!(c.config().bar_mode(), BarMode::Stacked);
    let bars = c.geometry().calculate_bar_positions();
    let jan: Vec<_> = ["Desktop", "Mobile", "Tablet"]
        .iter()
        .map(|g| bars[*g].iter().find(|b| b.category == "Jan").expect("bar"))
        .collect();

    assert_eq!(jan[0].y0, 0.0);
    assert_eq!((jan[0].y1, jan[1].y0), (52.0, 52.0));
    assert_eq!((jan[1].y1, jan[2].y0), (86.0, 86.0));
    assert_eq!(jan[2].y1, 206.0);
    // Pixel rects touch without overlapping.
    assert!((jan[0].rect.y - jan[1].rect.bottom()).abs() < 1e-9);
    assert!((jan[1].rect.y - jan[2].rect.bottom()).abs() < 1e-9);

    let (_, hi) = c.state().scales().y.as_linear().expect("linear y").domain();
    assert!(hi >= 206.0);
}

#[test]
fn duplicate_pairs_use_first_match_everywhere() {
    let data = json!([
        { "x": "Jan", "y": 10, "group": "A" },
        { "x": "Jan", "y": 500, "group": "A" },
        { "x": "Jan", "y": 5, "group": "B" }
    ]);
    let c = chart(ConfigLayer { stacked: Some(true), nice: Some(false), ..Default::default() }, &data);
    let bars = c.geometry().calculate_bar_positions();
    assert_eq!(bars["A"].len(), 1);
    assert_eq!(bars["A"][0].value, 10.0);
    assert_eq!((bars["B"][0].y0, bars["B"][0].y1), (10.0, 15.0));
    // The ignored duplicate does not leak into the domain either.
    let (_, hi) = c.state().scales().y.as_linear().expect("linear y").domain();
    assert!(hi < 20.0, "{hi}");
}

#[test]
fn grouped_bars_sit_side_by_side() {
    let c = chart(ConfigLayer { grouped: Some(true), ..Default::default() }, &devices());
    let bars = c.geometry().calculate_bar_positions();
    let jan: Vec<_> = bars.values().map(|v| v.iter().find(|b| b.category == "Jan").expect("bar").rect).collect();
    assert_eq!(jan.len(), 3);
    assert!(jan[0].right() <= jan[1].x && jan[1].right() <= jan[2].x);
    assert!(jan.iter().all(|r| r.bottom() == jan[0].bottom()));
}

#[test]
fn single_mode_domain_includes_zero() {
    let data = json!([{ "x": "a", "y": 40 }, { "x": "b", "y": 60 }]);
    let c = chart(ConfigLayer { nice: Some(false), ..Default::default() }, &data);
    let (lo, hi) = c.state().scales().y.as_linear().expect("linear y").domain();
    assert_eq!(lo, 0.0);
    assert!(hi > 60.0);
}

#[test]
fn hidden_groups_leave_the_stack() {
    let mut c = chart(ConfigLayer { stacked: Some(true), ..Default::default() }, &devices());
    c.toggle_group("Mobile");
    let bars = c.geometry().calculate_bar_positions();
    assert!(!bars.contains_key("Mobile"));
    let tablet = bars["Tablet"].iter().find(|b| b.category == "Jan").expect("bar");
    assert_eq!((tablet.y0, tablet.y1), (52.0, 172.0));
}

#[test]
fn horizontal_layout_and_hit_testing() {
    let c = chart(
        ConfigLayer { orientation: Some(Orientation::Horizontal), stacked: Some(true), ..Default::default() },
        &devices(),
    );
    let g = c.geometry();
    let bars = g.calculate_bar_positions();
    let desktop = bars["Desktop"].iter().find(|b| b.category == "Jan").expect("bar");
    let mobile = bars["Mobile"].iter().find(|b| b.category == "Jan").expect("bar");
    assert_eq!(desktop.rect.x, 0.0);
    assert!((mobile.rect.x - desktop.rect.right()).abs() < 1e-9);

    let cx = mobile.rect.x + mobile.rect.width / 2.0;
    let cy = mobile.rect.y + mobile.rect.height / 2.0;
    let hit = g.find_bar_at_position(cx, cy).expect("hit");
    assert_eq!((hit.group.as_str(), hit.category.as_str()), ("Mobile", "Jan"));
    assert!(g.find_bar_at_position(-50.0, cy).is_none());
}

#[test]
fn axes_use_bar_tick_counts() {
    let c = chart(ConfigLayer::default(), &devices());
    let axes = c.geometry().calculate_axes();
    let labels: Vec<_> = axes.x.ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["Feb", "Jan"]);
    // Tallest bar 120, padded and niced to [0, 140] in steps of 20.
    let y: Vec<_> = axes.y.ticks.iter().map(|t| (t.label.as_str(), t.position)).collect();
    assert_eq!(y.first(), Some(&("0", 340.0)));
    assert_eq!(y.last(), Some(&("140", 0.0)));
}

#[test]
fn categories_are_sorted_and_match_band_order() {
    let data = json!([{ "x": "Mar", "y": 3 }, { "x": "Jan", "y": 1 }, { "x": "Feb", "y": 2 }]);
    let c = chart(ConfigLayer::default(), &data);
    assert_eq!(c.state().categories().collect::<Vec<_>>(), ["Feb", "Jan", "Mar"]);

    let bars = c.geometry().calculate_bar_positions();
    let order: Vec<_> = bars["default"].iter().map(|b| b.category.as_str()).collect();
    assert_eq!(order, ["Feb", "Jan", "Mar"]);
    assert!(bars["default"].windows(2).all(|w| w[0].rect.right() <= w[1].rect.x));
}

#[test]
fn numeric_categories_sort_numerically() {
    let data = json!([{ "x": 10, "y": 1 }, { "x": 2, "y": 1 }, { "x": 33, "y": 1 }]);
    let c = chart(ConfigLayer::default(), &data);
    assert_eq!(c.state().categories().collect::<Vec<_>>(), ["2", "10", "33"]);
}
