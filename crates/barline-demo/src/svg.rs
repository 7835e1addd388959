// File: crates/barline-demo/src/svg.rs
// Summary: Serialize line and bar chart frames to standalone SVG documents.

use std::fmt::Write;

use barline_core::palette::Rgba;
use barline_core::path::fmt_coord;
use barline_core::{AxisPosition, Axes, Axis, BarChart, ElementKind, LegendItem, LineChart, Margins, ScaleType, Size};

const TEXT: &str = "#d2d2dc";
const AXIS: &str = "#b4b4be";
const GRID: &str = "#28282d";
const BACKGROUND: &str = "#121214";

/// Root `<svg>` plus a plot group translated by the margins.
struct SvgDoc {
    size: Size,
    margins: Margins,
    defs: Vec<String>,
    plot: Vec<String>,
}

impl SvgDoc {
    fn new(size: Size, margins: Margins) -> Self {
        Self { size, margins, defs: Vec::new(), plot: Vec::new() }
    }

    fn def(&mut self, s: String) {
        self.defs.push(s);
    }

    fn push(&mut self, s: String) {
        self.plot.push(s);
    }

    fn build(self) -> String {
        let (w, h) = (fmt_coord(self.size.width), fmt_coord(self.size.height));
        let mut out = String::new();
        let _ = writeln!(out, r#"<svg viewBox="0 0 {w} {h}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">"#);
        let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="{BACKGROUND}"/>"#);
        if !self.defs.is_empty() {
            out.push_str("  <defs>\n");
            for d in &self.defs {
                let _ = writeln!(out, "    {d}");
            }
            out.push_str("  </defs>\n");
        }
        let _ = writeln!(
            out,
            r#"  <g transform="translate({},{})">"#,
            fmt_coord(self.margins.left),
            fmt_coord(self.margins.top)
        );
        for el in &self.plot {
            for line in el.lines() {
                let _ = writeln!(out, "    {line}");
            }
        }
        out.push_str("  </g>\n</svg>\n");
        out
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn fill_attrs(c: Rgba) -> String {
    let rgb = Rgba { a: 255, ..c };
    if c.a == 255 {
        format!(r#"fill="{rgb}""#)
    } else {
        format!(r#"fill="{rgb}" fill-opacity="{:.3}""#, f64::from(c.a) / 255.0)
    }
}

pub fn line_svg(chart: &LineChart) -> String {
    let frame = chart.frame();
    let colors = &frame.scales.color;
    let inner = Size::new(frame.scales.inner_width, frame.scales.inner_height);
    let mut doc = SvgDoc::new(frame.size, frame.margins);

    let clip = chart.element_id(ElementKind::ClipPath, "plot");
    doc.def(format!(
        r#"<clipPath id="{clip}"><rect width="{}" height="{}"/></clipPath>"#,
        fmt_coord(inner.width),
        fmt_coord(inner.height)
    ));
    doc.push(axes_svg(&frame.axes, inner, frame.fonts.tick, frame.fonts.label));

    let mut series = String::new();
    let _ = writeln!(series, r#"<g clip-path="url(#{clip})">"#);
    for (group, d) in &frame.areas {
        let id = chart.element_id(ElementKind::Gradient, group);
        let c = colors.color(group);
        doc.def(format!(
            r#"<linearGradient id="{id}" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="{c}" stop-opacity="0.4"/><stop offset="1" stop-color="{c}" stop-opacity="0"/></linearGradient>"#
        ));
        let _ = writeln!(series, r#"  <path d="{d}" fill="url(#{id})"/>"#);
    }
    for (group, d) in &frame.lines {
        let _ = writeln!(series, r#"  <path d="{d}" fill="none" stroke="{}" stroke-width="2"/>"#, colors.color(group));
    }
    for seg in &frame.trends {
        let _ = writeln!(
            series,
            r#"  <path d="{}" fill="none" stroke="{}" stroke-width="2" stroke-dasharray="6 4"/>"#,
            seg.path,
            colors.color(&seg.group)
        );
    }
    for (group, dots) in &frame.dots {
        let c = colors.color(group);
        for dot in dots {
            let _ = writeln!(
                series,
                r#"  <circle cx="{}" cy="{}" r="{}" fill="{c}"/>"#,
                fmt_coord(dot.center.x),
                fmt_coord(dot.center.y),
                fmt_coord(dot.radius)
            );
        }
    }
    series.push_str("</g>");
    doc.push(series);
    doc.push(legend_svg(&frame.legend, frame.fonts.label));
    doc.build()
}

pub fn bar_svg(chart: &BarChart) -> String {
    let frame = chart.frame();
    let inner = Size::new(frame.scales.inner_width, frame.scales.inner_height);
    let mut doc = SvgDoc::new(frame.size, frame.margins);
    doc.push(axes_svg(&frame.axes, inner, frame.fonts.tick, frame.fonts.label));

    let mut bars = String::from("<g>\n");
    for bar in frame.bars.values().flatten() {
        let r = bar.rect;
        let _ = writeln!(
            bars,
            r#"  <rect x="{}" y="{}" width="{}" height="{}" {}><title>{}: {}</title></rect>"#,
            fmt_coord(r.x),
            fmt_coord(r.y),
            fmt_coord(r.width),
            fmt_coord(r.height),
            fill_attrs(bar.color),
            escape(&bar.group),
            fmt_coord(bar.value)
        );
    }
    bars.push_str("</g>");
    doc.push(bars);
    doc.push(legend_svg(&frame.legend, frame.fonts.label));
    doc.build()
}

fn axes_svg(axes: &Axes, inner: Size, tick_font: f64, label_font: f64) -> String {
    let mut out = String::from("<g font-family=\"sans-serif\">\n");
    if axes.y.scale_type != ScaleType::Ordinal {
        for t in &axes.y.ticks {
            let y = fmt_coord(t.position);
            let _ = writeln!(out, r#"  <line x1="0" y1="{y}" x2="{}" y2="{y}" stroke="{GRID}"/>"#, fmt_coord(inner.width));
        }
    }
    axis_svg(&mut out, &axes.x, inner, tick_font, label_font);
    axis_svg(&mut out, &axes.y, inner, tick_font, label_font);
    out.push_str("</g>");
    out
}

fn axis_svg(out: &mut String, axis: &Axis, inner: Size, tick_font: f64, label_font: f64) {
    let (a, b) = (fmt_coord(axis.extent.0), fmt_coord(axis.extent.1));
    let tf = fmt_coord(tick_font);
    if axis.position.is_horizontal() {
        let bottom = axis.position == AxisPosition::Bottom;
        let (y, dir) = if bottom { (inner.height, 1.0) } else { (0.0, -1.0) };
        let ys = fmt_coord(y);
        let _ = writeln!(out, r#"  <line x1="{a}" y1="{ys}" x2="{b}" y2="{ys}" stroke="{AXIS}"/>"#);
        for t in &axis.ticks {
            let x = fmt_coord(t.position);
            let _ = writeln!(
                out,
                r#"  <line x1="{x}" y1="{ys}" x2="{x}" y2="{}" stroke="{AXIS}"/><text x="{x}" y="{}" font-size="{tf}" fill="{TEXT}" text-anchor="middle">{}</text>"#,
                fmt_coord(y + 5.0 * dir),
                fmt_coord(y + dir * (tick_font + 6.0)),
                escape(&t.label)
            );
        }
        if let Some(label) = &axis.label {
            let _ = writeln!(
                out,
                r#"  <text x="{}" y="{}" font-size="{}" fill="{TEXT}" text-anchor="middle">{}</text>"#,
                fmt_coord(inner.width / 2.0),
                fmt_coord(y + dir * 34.0),
                fmt_coord(label_font),
                escape(label)
            );
        }
    } else {
        let left = axis.position == AxisPosition::Left;
        let (x, dir, anchor) = if left { (0.0, -1.0, "end") } else { (inner.width, 1.0, "start") };
        let xs = fmt_coord(x);
        let _ = writeln!(out, r#"  <line x1="{xs}" y1="{a}" x2="{xs}" y2="{b}" stroke="{AXIS}"/>"#);
        for t in &axis.ticks {
            let y = fmt_coord(t.position);
            let _ = writeln!(
                out,
                r#"  <line x1="{xs}" y1="{y}" x2="{}" y2="{y}" stroke="{AXIS}"/><text x="{}" y="{y}" dy="0.32em" font-size="{tf}" fill="{TEXT}" text-anchor="{anchor}">{}</text>"#,
                fmt_coord(x + 5.0 * dir),
                fmt_coord(x + 8.0 * dir),
                escape(&t.label)
            );
        }
        if let Some(label) = &axis.label {
            let _ = writeln!(
                out,
                r#"  <text x="{}" y="-6" font-size="{}" fill="{TEXT}" text-anchor="{anchor}">{}</text>"#,
                fmt_coord(x),
                fmt_coord(label_font),
                escape(label)
            );
        }
    }
}

/// Legend sits above the plot area, inside the top margin.
fn legend_svg(items: &[LegendItem], font: f64) -> String {
    if items.is_empty() {
        return String::new();
    }
    let rows = items.iter().map(|i| i.bounds.bottom()).fold(0.0_f64, f64::max);
    let mut out = format!(r#"<g class="legend" transform="translate(0,{})" font-family="sans-serif">"#, fmt_coord(-rows - 4.0));
    out.push('\n');
    for item in items {
        let s = item.swatch;
        let _ = writeln!(
            out,
            r#"  <g opacity="{}"><rect x="{}" y="{}" width="{}" height="{}" fill="{}"/><text x="{}" y="{}" dy="0.32em" font-size="{}" fill="{TEXT}">{}</text></g>"#,
            fmt_coord(item.opacity),
            fmt_coord(s.x),
            fmt_coord(s.y),
            fmt_coord(s.width),
            fmt_coord(s.height),
            item.entry.color,
            fmt_coord(item.label_x),
            fmt_coord(item.label_y),
            fmt_coord(font),
            escape(&item.entry.group)
        );
    }
    out.push_str("</g>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use barline_core::{ConfigLayer, LayeredConfig};
    use serde_json::json;

    #[test]
    fn line_document_has_one_path_per_group() {
        let mut chart = LineChart::new(LayeredConfig::new().with_user(ConfigLayer { show_area: Some(true), ..Default::default() }));
        chart
            .set_data(&json!([
                { "x": 1, "y": 2, "group": "a<b" },
                { "x": 2, "y": 3, "group": "a<b" },
                { "x": 1, "y": 1, "group": "c" }
            ]))
            .expect("valid data");
        let svg = line_svg(&chart);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("stroke-width=\"2\"").count(), 2);
        assert_eq!(svg.matches("<linearGradient").count(), 2);
        assert!(svg.contains("a&lt;b"));
        assert!(!svg.contains("a<b"));
    }

    #[test]
    fn bar_document_has_one_rect_per_bar() {
        let mut chart = BarChart::new(LayeredConfig::new());
        chart.set_data(&json!([{ "x": "a", "y": 1 }, { "x": "b", "y": 2 }])).expect("valid data");
        let svg = bar_svg(&chart);
        assert_eq!(svg.matches("<title>").count(), 2);
    }
}
