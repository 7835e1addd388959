// File: crates/barline-core/src/trend.rs
// Summary: Indicator trait and the least-squares trend extension used by line charts.

use serde::{Deserialize, Serialize};

use crate::geometry::ScreenPoint;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub enabled: bool,
    /// Number of trailing points fed to the regression (at least 2).
    pub window: usize,
    /// Projection length: days on a time axis, x units on a linear axis.
    pub projection_days: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self { enabled: false, window: 5, projection_days: 7.0 }
    }
}

/// Indicator transforms an (x, y) series into a derived series.
pub trait Indicator {
    fn id(&self) -> &'static str;
    fn compute(&self, input: &[(f64, f64)]) -> Vec<(f64, f64)>;
}

/// Ordinary least-squares line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

impl Regression {
    /// `None` with fewer than two points or no spread in x.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mx = points.iter().map(|p| p.0).sum::<f64>() / n;
        let my = points.iter().map(|p| p.1).sum::<f64>() / n;
        // Centered sums keep precision with epoch-millisecond abscissas.
        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), &(x, y)| {
            let dx = x - mx;
            (sxy + dx * (y - my), sxx + dx * dx)
        });
        if sxx == 0.0 || !sxx.is_finite() {
            return None;
        }
        let slope = sxy / sxx;
        Some(Self { slope, intercept: my - slope * mx })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Projects the trend of the trailing `window` points `horizon` units past the last point.
/// Output is either empty or exactly `[last_point, projected_point]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendExtension {
    pub window: usize,
    pub horizon: f64,
}

impl Indicator for TrendExtension {
    fn id(&self) -> &'static str { "trend_extension" }

    fn compute(&self, input: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let window = self.window.max(2);
        let tail = &input[input.len().saturating_sub(window)..];
        let Some(last) = tail.last().copied() else { return Vec::new() };
        let Some(reg) = Regression::fit(tail) else { return Vec::new() };
        let end_x = last.0 + self.horizon;
        let end_y = reg.predict(end_x);
        if !end_y.is_finite() {
            return Vec::new();
        }
        vec![last, (end_x, end_y)]
    }
}

/// Synthetic segment appended after a group's last real point.
#[derive(Clone, Debug, PartialEq)]
pub struct TrendSegment {
    pub group: String,
    /// (abscissa, y) in data units; abscissa is epoch millis on time axes.
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub screen_start: ScreenPoint,
    pub screen_end: ScreenPoint,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_a_line() {
        let reg = Regression::fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).expect("fit");
        assert!((reg.slope - 2.0).abs() < 1e-12);
        assert!((reg.intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn extension_uses_trailing_window() {
        // The early outlier falls outside the window of 3.
        let data = [(0.0, 100.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)];
        let ext = TrendExtension { window: 3, horizon: 2.0 }.compute(&data);
        assert_eq!(ext.len(), 2);
        assert_eq!(ext[0], (3.0, 3.0));
        assert!((ext[1].0 - 5.0).abs() < 1e-12 && (ext[1].1 - 5.0).abs() < 1e-9);
    }

    #[test]
    fn too_few_points_skip_silently() {
        assert!(TrendExtension { window: 1, horizon: 1.0 }.compute(&[(0.0, 1.0)]).is_empty());
        assert!(TrendExtension { window: 5, horizon: 1.0 }.compute(&[]).is_empty());
    }
}
