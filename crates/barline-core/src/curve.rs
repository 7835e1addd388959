// File: crates/barline-core/src/curve.rs
// Summary: Curve interpolants that connect projected points into SVG path segments.

use serde::{Deserialize, Serialize};

use crate::geometry::ScreenPoint;
use crate::path::PathBuilder;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurveType {
    #[default]
    Linear,
    /// Monotone in x; never overshoots between samples.
    Monotone,
    /// Natural cubic spline (zero second derivative at the ends).
    Natural,
    /// Step change halfway between samples.
    Step,
    StepBefore,
    StepAfter,
}

/// Full path string for `points` (empty string when `points` is empty).
pub fn curve_path(points: &[ScreenPoint], curve: CurveType) -> String {
    let mut b = PathBuilder::new();
    write_curve(&mut b, points, curve, true);
    b.finish()
}

/// Append the curve through `points` to `b`. With `start_new` false the first
/// point is joined with a line instead of starting a new subpath.
pub fn write_curve(b: &mut PathBuilder, points: &[ScreenPoint], curve: CurveType, start_new: bool) {
    let Some(first) = points.first() else { return };
    if start_new {
        b.move_to(first.x, first.y);
    } else {
        b.line_to(first.x, first.y);
    }
    if points.len() == 1 {
        return;
    }
    match curve {
        CurveType::Linear => linear(b, points),
        CurveType::Monotone => monotone_x(b, points),
        CurveType::Natural => natural(b, points),
        CurveType::Step => step(b, points, 0.5),
        CurveType::StepBefore => step(b, points, 0.0),
        CurveType::StepAfter => step(b, points, 1.0),
    }
}

fn linear(b: &mut PathBuilder, points: &[ScreenPoint]) {
    for p in &points[1..] {
        b.line_to(p.x, p.y);
    }
}

fn step(b: &mut PathBuilder, points: &[ScreenPoint], t: f64) {
    for w in points.windows(2) {
        let (p0, p1) = (w[0], w[1]);
        if t <= 0.0 {
            b.line_to(p0.x, p1.y);
            b.line_to(p1.x, p1.y);
        } else if t >= 1.0 {
            b.line_to(p1.x, p0.y);
            b.line_to(p1.x, p1.y);
        } else {
            let xm = p0.x * (1.0 - t) + p1.x * t;
            b.line_to(xm, p0.y);
            b.line_to(xm, p1.y);
        }
    }
    if t > 0.0 && t < 1.0 {
        if let Some(last) = points.last() {
            b.line_to(last.x, last.y);
        }
    }
}

fn secant(p0: ScreenPoint, p1: ScreenPoint) -> f64 {
    let h = p1.x - p0.x;
    if h == 0.0 { 0.0 } else { (p1.y - p0.y) / h }
}

/// Fritsch–Carlson style tangent at an interior point.
fn interior_tangent(p0: ScreenPoint, p1: ScreenPoint, p2: ScreenPoint) -> f64 {
    let h0 = p1.x - p0.x;
    let h1 = p2.x - p1.x;
    let s0 = secant(p0, p1);
    let s1 = secant(p1, p2);
    let p = if h0 + h1 == 0.0 { 0.0 } else { (s0 * h1 + s1 * h0) / (h0 + h1) };
    let t = (s0.signum() + s1.signum()) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_finite() { t } else { 0.0 }
}

fn end_tangent(p0: ScreenPoint, p1: ScreenPoint, t: f64) -> f64 {
    let h = p1.x - p0.x;
    if h == 0.0 { t } else { (3.0 * (p1.y - p0.y) / h - t) / 2.0 }
}

fn monotone_x(b: &mut PathBuilder, points: &[ScreenPoint]) {
    let n = points.len();
    if n == 2 {
        b.line_to(points[1].x, points[1].y);
        return;
    }
    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = interior_tangent(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = end_tangent(points[0], points[1], tangents[1]);
    tangents[n - 1] = end_tangent(points[n - 2], points[n - 1], tangents[n - 2]);

    for i in 0..n - 1 {
        let (p0, p1) = (points[i], points[i + 1]);
        let dx = (p1.x - p0.x) / 3.0;
        b.cubic_to(p0.x + dx, p0.y + dx * tangents[i], p1.x - dx, p1.y - dx * tangents[i + 1], p1.x, p1.y);
    }
}

/// Bezier control points of the natural spline through `v` (one coordinate).
fn natural_controls(v: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = v.len() - 1;
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    let mut r = vec![0.0; n];
    b[0] = 2.0;
    r[0] = v[0] + 2.0 * v[1];
    for i in 1..n.saturating_sub(1) {
        a[i] = 1.0;
        b[i] = 4.0;
        r[i] = 4.0 * v[i] + 2.0 * v[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * v[n - 1] + v[n];
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }
    b[n - 1] = (v[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * v[i + 1] - a[i + 1];
    }
    (a, b)
}

fn natural(b: &mut PathBuilder, points: &[ScreenPoint]) {
    if points.len() == 2 {
        b.line_to(points[1].x, points[1].y);
        return;
    }
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let (ax, bx) = natural_controls(&xs);
    let (ay, by) = natural_controls(&ys);
    for i in 0..points.len() - 1 {
        let p = points[i + 1];
        b.cubic_to(ax[i], ay[i], bx[i], by[i], p.x, p.y);
    }
}
