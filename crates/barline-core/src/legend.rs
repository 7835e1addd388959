// File: crates/barline-core/src/legend.rs
// Summary: Legend entries and row-wrapping legend layout shared by line and bar charts.

use serde::{Deserialize, Serialize};

use crate::geometry::RectF;
use crate::palette::Rgba;
use crate::scale::ColorScale;

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub group: String,
    pub color: Rgba,
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendOptions {
    pub show: bool,
    pub item_width: f64,
    pub row_height: f64,
    pub swatch_size: f64,
    /// Opacity applied to entries of hidden groups.
    pub hidden_opacity: f64,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self { show: true, item_width: 100.0, row_height: 20.0, swatch_size: 12.0, hidden_opacity: 0.35 }
    }
}

/// Positioned legend entry, relative to the legend origin.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    pub entry: LegendEntry,
    pub bounds: RectF,
    pub swatch: RectF,
    pub label_x: f64,
    pub label_y: f64,
    pub opacity: f64,
}

/// One entry per group, in declaration order.
pub fn legend_entries(groups: &[String], colors: &ColorScale, is_visible: impl Fn(&str) -> bool) -> Vec<LegendEntry> {
    groups
        .iter()
        .map(|g| LegendEntry { group: g.clone(), color: colors.color(g), visible: is_visible(g) })
        .collect()
}

/// Lay entries out left to right, wrapping to a new row when `available_width` is exceeded.
pub fn layout_legend(entries: &[LegendEntry], available_width: f64, opts: &LegendOptions) -> Vec<LegendItem> {
    let per_row = if opts.item_width > 0.0 {
        ((available_width / opts.item_width).floor() as usize).max(1)
    } else {
        entries.len().max(1)
    };
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let col = (i % per_row) as f64;
            let row = (i / per_row) as f64;
            let x = col * opts.item_width;
            let y = row * opts.row_height;
            let swatch_y = y + (opts.row_height - opts.swatch_size) / 2.0;
            LegendItem {
                entry: e.clone(),
                bounds: RectF::from_xywh(x, y, opts.item_width, opts.row_height),
                swatch: RectF::from_xywh(x, swatch_y, opts.swatch_size, opts.swatch_size),
                label_x: x + opts.swatch_size + 6.0,
                label_y: y + opts.row_height / 2.0,
                opacity: if e.visible { 1.0 } else { opts.hidden_opacity },
            }
        })
        .collect()
}

/// Legend item under a point in legend coordinates.
pub fn legend_hit(items: &[LegendItem], x: f64, y: f64) -> Option<&LegendItem> {
    items.iter().find(|it| it.bounds.contains(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_rows() {
        let groups: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let colors = ColorScale::new(groups.iter().cloned(), &[]);
        let entries = legend_entries(&groups, &colors, |g| g != "b");
        let items = layout_legend(&entries, 250.0, &LegendOptions::default());
        assert_eq!(items[1].bounds.x, 100.0);
        assert_eq!((items[2].bounds.x, items[2].bounds.y), (0.0, 20.0));
        assert!(items[1].opacity < 1.0);
        assert_eq!(legend_hit(&items, 5.0, 25.0).map(|i| i.entry.group.as_str()), Some("c"));
    }
}
