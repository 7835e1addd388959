// File: crates/barline-core/src/scale.rs
// Summary: Linear, time and band scales, the color scale, and the ScaleManager that builds them from data.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::{ProcessedPoint, XValue};
use crate::palette::{Rgba, CATEGORY10};
use crate::types::Orientation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    Time,
    Linear,
    Ordinal,
}

/// Detect the x scale type. Numeric check is exhaustive, date check existential.
pub fn detect_scale_type(data: &[ProcessedPoint]) -> ScaleType {
    if !data.is_empty() && data.iter().all(|p| matches!(p.x, XValue::Number(_))) {
        ScaleType::Linear
    } else if data.iter().any(ProcessedPoint::has_time) {
        ScaleType::Time
    } else {
        ScaleType::Ordinal
    }
}

// ---- linear -----------------------------------------------------------------

/// Affine mapping between a numeric domain and a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) { self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }

    /// A degenerate domain maps everything to the range midpoint.
    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return (r0 + r1) * 0.5;
        }
        r0 + (v - d0) / span * (r1 - r0)
    }

    #[inline]
    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        d0 + (px - r0) / span * (d1 - d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        linear_ticks(self.domain.0, self.domain.1, count)
    }

    /// Extend the domain outward to multiples of the tick step.
    pub fn nice(mut self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        let reversed = d1 < d0;
        let (mut lo, mut hi) = if reversed { (d1, d0) } else { (d0, d1) };
        if !(hi > lo) || count == 0 {
            return self;
        }
        let mut prev = 0.0;
        for _ in 0..10 {
            let step = tick_step(lo, hi, count);
            if !(step > 0.0) || !step.is_finite() || step == prev {
                break;
            }
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
            prev = step;
        }
        self.domain = if reversed { (hi, lo) } else { (lo, hi) };
        self
    }
}

/// 1-2-5 step for about `count` intervals across `[start, stop]`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    if !(raw > 0.0) || !raw.is_finite() {
        return 0.0;
    }
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

pub fn linear_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
    let step = tick_step(lo, hi, count);
    if !(step > 0.0) {
        return Vec::new();
    }
    let i0 = ((lo / step) - 1e-9).ceil() as i64;
    let i1 = ((hi / step) + 1e-9).floor() as i64;
    // Divide by the inverse for sub-unit steps to avoid 0.30000000000000004.
    let inv = (1.0 / step).round();
    let mut out: Vec<f64> = (i0..=i1)
        .map(|i| if step < 1.0 && inv > 0.0 { i as f64 / inv } else { i as f64 * step })
        .collect();
    if start > stop {
        out.reverse();
    }
    out
}

// ---- time -------------------------------------------------------------------

/// Calendar-aware tick interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInterval {
    Millis(i64),
    Months(u32),
    Years(i32),
}

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
pub const DAY_MILLIS: f64 = DAY as f64;

const TIME_INTERVALS: [TimeInterval; 17] = [
    TimeInterval::Millis(SECOND),
    TimeInterval::Millis(5 * SECOND),
    TimeInterval::Millis(15 * SECOND),
    TimeInterval::Millis(30 * SECOND),
    TimeInterval::Millis(MINUTE),
    TimeInterval::Millis(5 * MINUTE),
    TimeInterval::Millis(15 * MINUTE),
    TimeInterval::Millis(30 * MINUTE),
    TimeInterval::Millis(HOUR),
    TimeInterval::Millis(3 * HOUR),
    TimeInterval::Millis(6 * HOUR),
    TimeInterval::Millis(12 * HOUR),
    TimeInterval::Millis(DAY),
    TimeInterval::Millis(2 * DAY),
    TimeInterval::Millis(7 * DAY),
    TimeInterval::Months(1),
    TimeInterval::Months(3),
];

impl TimeInterval {
    /// Approximate length, used only for choosing an interval.
    pub fn approx_millis(&self) -> f64 {
        match *self {
            TimeInterval::Millis(ms) => ms as f64,
            TimeInterval::Months(m) => m as f64 * 30.0 * DAY_MILLIS,
            TimeInterval::Years(y) => y as f64 * 365.0 * DAY_MILLIS,
        }
    }

    pub fn format(&self, d: &DateTime<Utc>) -> String {
        let pattern = match *self {
            TimeInterval::Millis(ms) if ms < MINUTE => "%H:%M:%S",
            TimeInterval::Millis(ms) if ms < DAY => "%H:%M",
            TimeInterval::Millis(_) => "%b %d",
            TimeInterval::Months(_) => "%b %Y",
            TimeInterval::Years(_) => "%Y",
        };
        d.format(pattern).to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    domain: (DateTime<Utc>, DateTime<Utc>),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) { self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }

    fn millis_scale(&self) -> LinearScale {
        LinearScale::new(
            (self.domain.0.timestamp_millis() as f64, self.domain.1.timestamp_millis() as f64),
            self.range,
        )
    }

    pub fn map(&self, d: &DateTime<Utc>) -> f64 {
        self.map_millis(d.timestamp_millis() as f64)
    }

    pub fn map_millis(&self, ms: f64) -> f64 {
        self.millis_scale().map(ms)
    }

    pub fn invert(&self, px: f64) -> DateTime<Utc> {
        let ms = self.millis_scale().invert(px);
        Utc.timestamp_millis_opt(ms.round() as i64).single().unwrap_or(self.domain.0)
    }

    pub fn interval(&self, count: usize) -> TimeInterval {
        let span = (self.domain.1 - self.domain.0).num_milliseconds().abs() as f64;
        let target = span / count.max(1) as f64;
        if target > TimeInterval::Months(3).approx_millis() * 2.0 {
            let years = span / (365.0 * DAY_MILLIS);
            let step = tick_step(0.0, years, count).max(1.0);
            return TimeInterval::Years(step.round() as i32);
        }
        // Closest interval in log space.
        TIME_INTERVALS
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = (a.approx_millis() / target.max(1.0)).ln().abs();
                let db = (b.approx_millis() / target.max(1.0)).ln().abs();
                da.total_cmp(&db)
            })
            .unwrap_or(TimeInterval::Millis(DAY))
    }

    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        if count == 0 {
            return Vec::new();
        }
        let (a, b) = self.domain;
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        if start == end {
            return vec![start];
        }
        let mut out = Vec::new();
        match self.interval(count) {
            TimeInterval::Millis(ms) => {
                let s = start.timestamp_millis();
                let mut t = s.div_euclid(ms) * ms;
                if t < s {
                    t += ms;
                }
                while t <= end.timestamp_millis() && out.len() < 1_000 {
                    if let Some(d) = Utc.timestamp_millis_opt(t).single() {
                        out.push(d);
                    }
                    t += ms;
                }
            }
            TimeInterval::Months(step) => {
                let step = step.max(1) as i32;
                let mut idx = start.year() * 12 + start.month0() as i32;
                idx += (step - idx.rem_euclid(step)) % step;
                while let Some(d) = month_start(idx) {
                    if d < start {
                        idx += step;
                        continue;
                    }
                    if d > end || out.len() >= 1_000 {
                        break;
                    }
                    out.push(d);
                    idx += step;
                }
            }
            TimeInterval::Years(step) => {
                let step = step.max(1);
                let mut year = start.year();
                year += (step - year.rem_euclid(step)) % step;
                while let Some(d) = month_start(year * 12) {
                    if d < start {
                        year += step;
                        continue;
                    }
                    if d > end || out.len() >= 1_000 {
                        break;
                    }
                    out.push(d);
                    year += step;
                }
            }
        }
        out
    }
}

/// First instant of the month with absolute index `year * 12 + month0`.
fn month_start(idx: i32) -> Option<DateTime<Utc>> {
    let year = idx.div_euclid(12);
    let month = idx.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| Utc.from_utc_datetime(&d))
}

// ---- band -------------------------------------------------------------------

/// Ordinal scale dividing a range into equal bands.
/// With inner padding 1 it degenerates to a point scale (zero bandwidth).
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: IndexSet<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(domain: impl IntoIterator<Item = String>, range: (f64, f64)) -> Self {
        let mut s = Self {
            domain: domain.into_iter().collect(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            start: range.0,
            step: 0.0,
            bandwidth: 0.0,
        };
        s.rescale();
        s
    }

    /// Point configuration: categories sit on evenly spaced positions.
    pub fn point(domain: impl IntoIterator<Item = String>, range: (f64, f64), padding: f64) -> Self {
        Self::new(domain, range).with_padding(1.0, padding)
    }

    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (lo, hi) = if r0 <= r1 { (r0, r1) } else { (r1, r0) };
        let denom = (n - self.padding_inner + self.padding_outer * 2.0).max(1.0);
        self.step = (hi - lo) / denom;
        self.start = lo + (hi - lo - self.step * (n - self.padding_inner)) * self.align;
        self.bandwidth = self.step * (1.0 - self.padding_inner);
    }

    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }
    pub fn len(&self) -> usize { self.domain.len() }
    pub fn is_empty(&self) -> bool { self.domain.is_empty() }
    pub fn range(&self) -> (f64, f64) { self.range }
    pub fn bandwidth(&self) -> f64 { self.bandwidth }
    pub fn step(&self) -> f64 { self.step }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.domain.get_index_of(key)
    }

    pub fn band_start(&self, key: &str) -> Option<f64> {
        self.index_of(key).map(|i| self.start + self.step * i as f64)
    }

    pub fn center(&self, key: &str) -> Option<f64> {
        self.band_start(key).map(|x| x + self.bandwidth * 0.5)
    }

    /// Nearest category to a pixel position.
    pub fn index_at(&self, px: f64) -> Option<usize> {
        if self.domain.is_empty() || !px.is_finite() {
            return None;
        }
        if self.step == 0.0 {
            return Some(0);
        }
        let i = ((px - self.start - self.bandwidth * 0.5) / self.step).round();
        Some(i.clamp(0.0, (self.domain.len() - 1) as f64) as usize)
    }

    pub fn key_at(&self, px: f64) -> Option<&str> {
        self.index_at(px).and_then(|i| self.domain.get_index(i)).map(String::as_str)
    }
}

// ---- axis scale enum --------------------------------------------------------

/// Data coordinate recovered from a pixel position.
#[derive(Clone, Debug, PartialEq)]
pub enum DataValue {
    Time(DateTime<Utc>),
    Number(f64),
    Category(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Scale {
    Time(TimeScale),
    Linear(LinearScale),
    Ordinal(BandScale),
}

impl Scale {
    pub fn scale_type(&self) -> ScaleType {
        match self {
            Scale::Time(_) => ScaleType::Time,
            Scale::Linear(_) => ScaleType::Linear,
            Scale::Ordinal(_) => ScaleType::Ordinal,
        }
    }

    pub fn range(&self) -> (f64, f64) {
        match self {
            Scale::Time(s) => s.range(),
            Scale::Linear(s) => s.range(),
            Scale::Ordinal(s) => s.range(),
        }
    }

    pub fn as_linear(&self) -> Option<&LinearScale> {
        match self {
            Scale::Linear(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_band(&self) -> Option<&BandScale> {
        match self {
            Scale::Ordinal(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&TimeScale> {
        match self {
            Scale::Time(s) => Some(s),
            _ => None,
        }
    }

    /// Pixel position of a point's x under this scale; `None` when the point has
    /// no coordinate this scale can read (or the result is not finite).
    pub fn project_x(&self, p: &ProcessedPoint) -> Option<f64> {
        let px = match self {
            Scale::Time(s) => p.has_time().then(|| s.map(&p.parsed_date))?,
            Scale::Linear(s) => s.map(p.x.as_number()?),
            Scale::Ordinal(s) => {
                if p.x.is_missing() {
                    return None;
                }
                s.center(&p.category())?
            }
        };
        px.is_finite().then_some(px)
    }

    /// Continuous abscissa of a point (millis for time, the number for linear).
    pub fn abscissa(&self, p: &ProcessedPoint) -> Option<f64> {
        match self {
            Scale::Time(_) => p.has_time().then(|| p.timestamp_millis()),
            Scale::Linear(_) => p.x.as_number(),
            Scale::Ordinal(_) => None,
        }
    }

    /// Map a continuous abscissa (see [`Scale::abscissa`]) to pixels.
    pub fn map_abscissa(&self, v: f64) -> Option<f64> {
        let px = match self {
            Scale::Time(s) => s.map_millis(v),
            Scale::Linear(s) => s.map(v),
            Scale::Ordinal(_) => return None,
        };
        px.is_finite().then_some(px)
    }

    pub fn invert(&self, px: f64) -> Option<DataValue> {
        match self {
            Scale::Time(s) => Some(DataValue::Time(s.invert(px))),
            Scale::Linear(s) => Some(DataValue::Number(s.invert(px))),
            Scale::Ordinal(s) => s.key_at(px).map(|k| DataValue::Category(k.to_string())),
        }
    }
}

// ---- color ------------------------------------------------------------------

/// Group name → palette color. Never fails; colors repeat when groups outnumber the palette.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScale {
    domain: IndexMap<String, usize>,
    palette: Vec<Rgba>,
}

impl ColorScale {
    pub fn new<S: Into<String>>(groups: impl IntoIterator<Item = S>, palette: &[Rgba]) -> Self {
        let palette = if palette.is_empty() { CATEGORY10.to_vec() } else { palette.to_vec() };
        let mut domain = IndexMap::new();
        for g in groups {
            let next = domain.len();
            domain.entry(g.into()).or_insert(next);
        }
        Self { domain, palette }
    }

    pub fn color(&self, group: &str) -> Rgba {
        let idx = match self.domain.get(group) {
            Some(i) => *i,
            // Unknown groups get a stable slot without mutating the scale.
            None => {
                let mut h = std::collections::hash_map::DefaultHasher::new();
                group.hash(&mut h);
                h.finish() as usize
            }
        };
        self.palette[idx % self.palette.len()]
    }

    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.domain.keys().map(String::as_str)
    }

    pub fn palette(&self) -> &[Rgba] {
        &self.palette
    }
}

// ---- manager ----------------------------------------------------------------

/// Scales for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBundle {
    pub x: Scale,
    pub y: Scale,
    pub color: ColorScale,
    pub inner_width: f64,
    pub inner_height: f64,
}

/// How an ordinal x axis divides its range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrdinalLayout {
    Point { padding: f64 },
    Band { inner: f64, outer: f64 },
}

pub struct ScaleOptions<'a> {
    /// Points that drive the x domain.
    pub data: &'a [ProcessedPoint],
    /// Points that drive the y domain when `value_extent` is `None`.
    pub value_data: &'a [&'a ProcessedPoint],
    pub groups: &'a [String],
    pub scale_type: ScaleType,
    pub inner_width: f64,
    pub inner_height: f64,
    /// Raw (unpadded) value extent computed by the caller, e.g. stacked sums.
    pub value_extent: Option<(f64, f64)>,
    pub nice: bool,
    pub value_ticks: usize,
    pub palette: &'a [Rgba],
    pub ordinal: OrdinalLayout,
    /// Horizontal puts the categorical/x scale on the vertical axis.
    pub orientation: Orientation,
    /// Extends a continuous x domain to include this abscissa.
    pub x_extend_to: Option<f64>,
    /// Ordinal domain in this order; first-seen order of `data` when `None`.
    pub ordinal_keys: Option<&'a [String]>,
}

pub struct ScaleManager;

impl ScaleManager {
    pub fn create_scales(opts: &ScaleOptions<'_>) -> ScaleBundle {
        let (w, h) = (opts.inner_width.max(0.0), opts.inner_height.max(0.0));
        let (cat_range, value_range) = match opts.orientation {
            Orientation::Vertical => ((0.0, w), (h, 0.0)),
            Orientation::Horizontal => ((0.0, h), (0.0, w)),
        };

        let x = match opts.scale_type {
            ScaleType::Time => {
                let (mut lo, mut hi) = time_domain(opts.data);
                if let Some(ext) = opts.x_extend_to.and_then(|v| Utc.timestamp_millis_opt(v as i64).single()) {
                    lo = lo.min(ext);
                    hi = hi.max(ext);
                }
                Scale::Time(TimeScale::new((lo, hi), cat_range))
            }
            ScaleType::Linear => {
                let (mut lo, mut hi) = linear_x_domain(opts.data);
                if let Some(ext) = opts.x_extend_to.filter(|v| v.is_finite()) {
                    lo = lo.min(ext);
                    hi = hi.max(ext);
                }
                Scale::Linear(LinearScale::new((lo, hi), cat_range))
            }
            ScaleType::Ordinal => {
                let keys = opts.ordinal_keys.map_or_else(|| ordinal_domain(opts.data), <[String]>::to_vec);
                let band = match opts.ordinal {
                    OrdinalLayout::Point { padding } => BandScale::point(keys, cat_range, padding),
                    OrdinalLayout::Band { inner, outer } => BandScale::new(keys, cat_range).with_padding(inner, outer),
                };
                Scale::Ordinal(band)
            }
        };

        let (lo, hi) = opts
            .value_extent
            .unwrap_or_else(|| zero_anchored_extent(opts.value_data.iter().map(|p| p.y)));
        let (lo, hi) = pad_domain(lo, hi);
        let mut y = LinearScale::new((lo, hi), value_range);
        if opts.nice {
            y = y.nice(opts.value_ticks.max(1));
        }

        debug!(
            scale_type = ?opts.scale_type,
            points = opts.data.len(),
            y_min = y.domain().0,
            y_max = y.domain().1,
            "built scales"
        );

        let color = ColorScale::new(opts.groups.iter().cloned(), opts.palette);
        let (x, y) = match opts.orientation {
            Orientation::Vertical => (x, Scale::Linear(y)),
            Orientation::Horizontal => (Scale::Linear(y), x),
        };
        ScaleBundle { x, y, color, inner_width: w, inner_height: h }
    }
}

/// Min/max of valid dates; `[now, now]` when there are none.
pub fn time_domain(data: &[ProcessedPoint]) -> (DateTime<Utc>, DateTime<Utc>) {
    let mut it = data.iter().filter(|p| p.has_time()).map(|p| p.parsed_date);
    match it.next() {
        Some(first) => it.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))),
        None => {
            let now = Utc::now();
            (now, now)
        }
    }
}

/// Min/max of numeric x; `[0, 1]` when there are none.
pub fn linear_x_domain(data: &[ProcessedPoint]) -> (f64, f64) {
    let (lo, hi) = data
        .iter()
        .filter_map(|p| p.x.as_number())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() { (lo, hi) } else { (0.0, 1.0) }
}

/// Unique stringified x values in first-seen order.
pub fn ordinal_domain(data: &[ProcessedPoint]) -> Vec<String> {
    let set: IndexSet<String> = data.iter().filter(|p| !p.x.is_missing()).map(|p| p.category()).collect();
    set.into_iter().collect()
}

/// `[min(0, min), max(0, max)]` of the values; `(0, 0)` when empty.
pub fn zero_anchored_extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.filter(|v| v.is_finite()).fold((0.0, 0.0), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Pad a value extent so flat or zero series keep a visible extent.
/// Sides anchored at zero are not padded past zero; `[0, 1]` when there is nothing to pad.
pub fn pad_domain(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span > 0.0 {
        let pad = span * 0.05;
        let lo = if lo < 0.0 { lo - pad } else { lo };
        let hi = if hi > 0.0 { hi + pad } else { hi };
        return (lo, hi);
    }
    let magnitude = lo.abs().max(hi.abs());
    if magnitude == 0.0 {
        return (0.0, 1.0);
    }
    let pad = magnitude * 0.1;
    (lo - pad, hi + pad)
}

/// Shift `d` by whole days.
pub fn add_days(d: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    d + Duration::milliseconds((days * DAY_MILLIS) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_round_trip_and_degenerate() {
        let s = LinearScale::new((0.0, 100.0), (0.0, 500.0));
        assert_eq!(s.map(50.0), 250.0);
        assert!((s.invert(s.map(33.3)) - 33.3).abs() < 1e-9);
        let flat = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert_eq!(flat.map(5.0), 50.0);
    }

    #[test]
    fn ticks_are_nice() {
        assert_eq!(linear_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(linear_ticks(0.0, 1.0, 5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(linear_ticks(0.0, 0.3, 3), vec![0.0, 0.1, 0.2, 0.3]);
        assert!(linear_ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn nice_extends_outward() {
        let s = LinearScale::new((-9.4, 131.4), (400.0, 0.0)).nice(5);
        assert_eq!(s.domain(), (-50.0, 150.0));
    }

    #[test]
    fn band_layout() {
        let b = BandScale::new(["a", "b", "c", "d"].map(String::from), (0.0, 400.0)).with_padding(0.2, 0.1);
        assert!((b.step() - 400.0 / 4.0).abs() < 1e-9);
        assert!((b.bandwidth() - 80.0).abs() < 1e-9);
        assert!((b.band_start("a").unwrap_or_default() - 10.0).abs() < 1e-9);
        assert_eq!(b.key_at(b.center("c").unwrap_or_default()), Some("c"));
        assert_eq!(b.key_at(-1000.0), Some("a"));
    }

    #[test]
    fn point_scale_centers_single_category() {
        let p = BandScale::point(["only".to_string()], (0.0, 300.0), 0.5);
        assert_eq!(p.center("only"), Some(150.0));
        assert_eq!(p.bandwidth(), 0.0);
    }

    #[test]
    fn padding_rules() {
        let (lo, hi) = pad_domain(-3.0, 125.0);
        assert!((lo - (-3.0 - 6.4)).abs() < 1e-9 && (hi - 131.4).abs() < 1e-9);
        assert_eq!(pad_domain(0.0, 0.0), (0.0, 1.0));
        assert_eq!(pad_domain(0.0, 50.0), (0.0, 52.5));
        assert_eq!(pad_domain(-5.0, -5.0), (-5.5, -4.5));
    }

    #[test]
    fn color_scale_cycles() {
        let groups: Vec<String> = (0..12).map(|i| format!("g{i}")).collect();
        let c = ColorScale::new(groups.iter().cloned(), &[]);
        assert_eq!(c.color("g0"), CATEGORY10[0]);
        assert_eq!(c.color("g10"), CATEGORY10[0]);
        assert_eq!(c.color("g11"), CATEGORY10[1]);
        let _ = c.color("unknown");
    }

    #[test]
    fn monthly_ticks_land_on_month_starts() {
        let d = |y, m| month_start(y * 12 + m - 1).unwrap_or_default();
        let s = TimeScale::new((d(2024, 1), d(2024, 12)), (0.0, 800.0));
        let ticks = s.ticks(6);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| t.day() == 1));
    }
}
