// File: crates/barline-core/src/render.rs
// Summary: Headless PNG rendering of chart frames using Skia CPU raster surfaces.

use anyhow::{anyhow, Result};
use skia_safe as skia;

use crate::axis::{Axes, Axis};
use crate::chart::{BarChart, LineChart};
use crate::legend::LegendItem;
use crate::palette::Rgba;
use crate::responsive::FontSizes;
use crate::scale::ScaleType;
use crate::types::{AxisPosition, Margins, Size};

pub struct RenderStyle {
    pub background: Rgba,
    pub grid: Rgba,
    pub axis: Rgba,
    pub text: Rgba,
    pub line_width: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(18, 18, 20),
            grid: Rgba::rgb(40, 40, 45),
            axis: Rgba::rgb(180, 180, 190),
            text: Rgba::rgb(210, 210, 220),
            line_width: 2.0,
        }
    }
}

fn color(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn paint(c: Rgba, style: skia::paint::Style, width: f32) -> skia::Paint {
    let mut p = skia::Paint::default();
    p.set_anti_alias(true);
    p.set_color(color(c));
    p.set_style(style);
    p.set_stroke_width(width);
    p
}

/// Raster `size`, translate to the plot origin, run `draw`, and encode as PNG.
fn raster(size: Size, margins: &Margins, background: Rgba, draw: impl FnOnce(&skia::Canvas)) -> Result<Vec<u8>> {
    let (w, h) = (size.width.round().max(1.0) as i32, size.height.round().max(1.0) as i32);
    let mut surface =
        skia::surfaces::raster_n32_premul((w, h)).ok_or_else(|| anyhow!("failed to create raster surface"))?;
    let canvas = surface.canvas();
    canvas.clear(color(background));
    canvas.save();
    canvas.translate((margins.left as f32, margins.top as f32));
    draw(canvas);
    canvas.restore();

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

pub fn render_line_png(chart: &LineChart, style: &RenderStyle) -> Result<Vec<u8>> {
    let frame = chart.frame();
    let colors = &frame.scales.color;
    let inner = Size::new(frame.scales.inner_width, frame.scales.inner_height);
    raster(frame.size, &frame.margins, style.background, |canvas| {
        draw_axes(canvas, &frame.axes, inner, &frame.fonts, style);
        for (group, d) in &frame.areas {
            if let Some(path) = skia::Path::from_svg(d) {
                canvas.draw_path(&path, &paint(colors.color(group).with_alpha(64), skia::paint::Style::Fill, 0.0));
            }
        }
        for (group, d) in &frame.lines {
            if let Some(path) = skia::Path::from_svg(d) {
                canvas.draw_path(&path, &paint(colors.color(group), skia::paint::Style::Stroke, style.line_width));
            }
        }
        for seg in &frame.trends {
            let mut p = paint(colors.color(&seg.group), skia::paint::Style::Stroke, style.line_width);
            p.set_path_effect(skia::PathEffect::dash(&[6.0, 4.0], 0.0));
            canvas.draw_line(
                (seg.screen_start.x as f32, seg.screen_start.y as f32),
                (seg.screen_end.x as f32, seg.screen_end.y as f32),
                &p,
            );
        }
        for (group, dots) in &frame.dots {
            let fill = paint(colors.color(group), skia::paint::Style::Fill, 0.0);
            for dot in dots {
                canvas.draw_circle((dot.center.x as f32, dot.center.y as f32), dot.radius as f32, &fill);
            }
        }
        draw_legend(canvas, &frame.legend, &frame.fonts, style);
    })
}

pub fn render_bar_png(chart: &BarChart, style: &RenderStyle) -> Result<Vec<u8>> {
    let frame = chart.frame();
    let inner = Size::new(frame.scales.inner_width, frame.scales.inner_height);
    raster(frame.size, &frame.margins, style.background, |canvas| {
        draw_axes(canvas, &frame.axes, inner, &frame.fonts, style);
        for bars in frame.bars.values() {
            for bar in bars {
                let r = bar.rect;
                let rect = skia::Rect::from_xywh(r.x as f32, r.y as f32, r.width as f32, r.height as f32);
                canvas.draw_rect(rect, &paint(bar.color, skia::paint::Style::Fill, 0.0));
            }
        }
        draw_legend(canvas, &frame.legend, &frame.fonts, style);
    })
}

/// Write encoded bytes, creating parent directories.
pub fn write_png(path: impl AsRef<std::path::Path>, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

// ---- helpers ----------------------------------------------------------------

fn draw_axes(canvas: &skia::Canvas, axes: &Axes, inner: Size, fonts: &FontSizes, style: &RenderStyle) {
    let grid = paint(style.grid, skia::paint::Style::Stroke, 1.0);
    if axes.y.scale_type != ScaleType::Ordinal {
        for t in &axes.y.ticks {
            canvas.draw_line((0.0, t.position as f32), (inner.width as f32, t.position as f32), &grid);
        }
    }
    draw_axis(canvas, &axes.x, inner, fonts, style);
    draw_axis(canvas, &axes.y, inner, fonts, style);
}

fn draw_axis(canvas: &skia::Canvas, axis: &Axis, inner: Size, fonts: &FontSizes, style: &RenderStyle) {
    let line = paint(style.axis, skia::paint::Style::Stroke, 1.5);
    let text = paint(style.text, skia::paint::Style::Fill, 0.0);
    let mut font = skia::Font::default();
    font.set_size(fonts.tick as f32);
    let (w, h) = (inner.width as f32, inner.height as f32);
    let (a, b) = (axis.extent.0 as f32, axis.extent.1 as f32);

    match axis.position {
        AxisPosition::Bottom | AxisPosition::Top => {
            let y = if axis.position == AxisPosition::Bottom { h } else { 0.0 };
            let dir = if axis.position == AxisPosition::Bottom { 1.0 } else { -1.0 };
            canvas.draw_line((a, y), (b, y), &line);
            for t in &axis.ticks {
                let x = t.position as f32;
                canvas.draw_line((x, y), (x, y + 5.0 * dir), &line);
                canvas.draw_str(&t.label, (x - 10.0, y + dir * (fonts.tick as f32 + 6.0)), &font, &text);
            }
            if let Some(label) = &axis.label {
                font.set_size(fonts.label as f32);
                canvas.draw_str(label, (w - 80.0, y + dir * 34.0), &font, &text);
            }
        }
        AxisPosition::Left | AxisPosition::Right => {
            let x = if axis.position == AxisPosition::Left { 0.0 } else { w };
            let dir = if axis.position == AxisPosition::Left { -1.0 } else { 1.0 };
            canvas.draw_line((x, a), (x, b), &line);
            for t in &axis.ticks {
                let y = t.position as f32;
                canvas.draw_line((x, y), (x + 5.0 * dir, y), &line);
                let offset = if dir < 0.0 { -40.0 } else { 8.0 };
                canvas.draw_str(&t.label, (x + offset, y + 4.0), &font, &text);
            }
            if let Some(label) = &axis.label {
                font.set_size(fonts.label as f32);
                canvas.draw_str(label, (x + dir * 48.0, -6.0), &font, &text);
            }
        }
    }
}

fn draw_legend(canvas: &skia::Canvas, items: &[LegendItem], fonts: &FontSizes, style: &RenderStyle) {
    if items.is_empty() {
        return;
    }
    let mut font = skia::Font::default();
    font.set_size(fonts.label as f32);
    // Legend sits above the plot area, inside the top margin.
    let rows = items.iter().map(|i| i.bounds.bottom()).fold(0.0_f64, f64::max);
    let origin_y = -(rows as f32) - 4.0;
    canvas.save();
    canvas.translate((0.0, origin_y));
    for item in items {
        let alpha = (item.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let s = item.swatch;
        let rect = skia::Rect::from_xywh(s.x as f32, s.y as f32, s.width as f32, s.height as f32);
        canvas.draw_rect(rect, &paint(item.entry.color.with_alpha(alpha), skia::paint::Style::Fill, 0.0));
        let text = paint(style.text.with_alpha(alpha), skia::paint::Style::Fill, 0.0);
        canvas.draw_str(&item.entry.group, (item.label_x as f32, item.label_y as f32 + 4.0), &font, &text);
    }
    canvas.restore();
}
