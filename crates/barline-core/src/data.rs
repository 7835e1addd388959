// File: crates/barline-core/src/data.rs
// Summary: Raw record model, processed point model, and the DataProcessor (normalize, validate, sort).
// Notes:
// - Raw records are free-form JSON objects; accessors extract x/y/group semantics.
// - Processing never fails: bad x falls back to a fixed "now", bad y to 0.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ValidationError, ValidationReport, ValidationWarning};

/// Field names probed, in order, when no accessor is supplied.
pub const X_KEYS: [&str; 3] = ["x", "date", "timestamp"];
pub const Y_KEYS: [&str; 2] = ["y", "value"];
pub const GROUP_KEYS: [&str; 3] = ["group", "series", "category"];

/// Group assigned to records without a usable group field.
pub const DEFAULT_GROUP: &str = "default";

/// Dates at or before this year are treated as parse accidents, not real timestamps.
pub const MIN_VALID_YEAR: i32 = 1900;

/// Arbitrary input record. No fields are required.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawPoint(Map<String, Value>);

impl RawPoint {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// First non-null value among `keys`.
    pub fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().filter_map(|k| self.0.get(*k)).find(|v| !v.is_null())
    }
}

impl From<Map<String, Value>> for RawPoint {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// The x coordinate as supplied, before any scale decides how to read it.
#[derive(Clone, Debug, PartialEq)]
pub enum XValue {
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
    Missing,
}

impl XValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map_or(XValue::Missing, XValue::Number),
            Value::String(s) => XValue::Text(s.clone()),
            Value::Bool(b) => XValue::Text(b.to_string()),
            _ => XValue::Missing,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            XValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, XValue::Missing)
    }

    /// Stringified form used as an ordinal/category key.
    pub fn key(&self) -> String {
        match self {
            XValue::Number(n) => format_number_key(*n),
            XValue::Date(d) => d.to_rfc3339(),
            XValue::Text(s) => s.clone(),
            XValue::Missing => String::new(),
        }
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

fn format_number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Normalized point. `y` is always finite and `group` never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedPoint {
    /// Parsed date, or the processing-time fallback when `date_valid` is false.
    pub parsed_date: DateTime<Utc>,
    pub date_valid: bool,
    pub x: XValue,
    pub y: f64,
    pub group: String,
    pub original: RawPoint,
}

impl ProcessedPoint {
    /// Category key for ordinal scales and bar charts.
    pub fn category(&self) -> String {
        self.x.key()
    }

    pub fn timestamp_millis(&self) -> f64 {
        self.parsed_date.timestamp_millis() as f64
    }

    /// True when the point carries a real date usable on a time scale.
    pub fn has_time(&self) -> bool {
        self.date_valid && chrono::Datelike::year(&self.parsed_date) > MIN_VALID_YEAR
    }
}

pub type Accessor = Box<dyn Fn(&RawPoint) -> Option<Value>>;
pub type DateParser = Box<dyn Fn(&XValue) -> Option<DateTime<Utc>>>;
pub type Filter = Box<dyn Fn(&ProcessedPoint) -> bool>;
pub type Comparator = Box<dyn Fn(&ProcessedPoint, &ProcessedPoint) -> Ordering>;

#[derive(Default)]
pub enum SortKey {
    /// Numeric x when both points are numeric, otherwise parsed date.
    #[default]
    X,
    Y,
    Date,
    Custom(Comparator),
}

/// Options for [`DataProcessor::process`].
pub struct ProcessOptions {
    pub x_accessor: Option<Accessor>,
    pub y_accessor: Option<Accessor>,
    pub group_accessor: Option<Accessor>,
    pub date_parser: Option<DateParser>,
    pub filter: Option<Filter>,
    pub sort: bool,
    pub sort_key: SortKey,
    /// Date substituted for unparsable x values; defaults to the wall clock at process time.
    pub fallback_date: Option<DateTime<Utc>>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            x_accessor: None,
            y_accessor: None,
            group_accessor: None,
            date_parser: None,
            filter: None,
            sort: true,
            sort_key: SortKey::X,
            fallback_date: None,
        }
    }
}

impl ProcessOptions {
    pub fn with_x(mut self, f: impl Fn(&RawPoint) -> Option<Value> + 'static) -> Self {
        self.x_accessor = Some(Box::new(f));
        self
    }

    pub fn with_y(mut self, f: impl Fn(&RawPoint) -> Option<Value> + 'static) -> Self {
        self.y_accessor = Some(Box::new(f));
        self
    }

    pub fn with_group(mut self, f: impl Fn(&RawPoint) -> Option<Value> + 'static) -> Self {
        self.group_accessor = Some(Box::new(f));
        self
    }

    pub fn with_date_parser(mut self, f: impl Fn(&XValue) -> Option<DateTime<Utc>> + 'static) -> Self {
        self.date_parser = Some(Box::new(f));
        self
    }

    pub fn with_filter(mut self, f: impl Fn(&ProcessedPoint) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(f));
        self
    }

    pub fn with_sort_key(mut self, key: SortKey) -> Self {
        self.sort = true;
        self.sort_key = key;
        self
    }

    pub fn unsorted(mut self) -> Self {
        self.sort = false;
        self
    }

    pub fn with_fallback_date(mut self, date: DateTime<Utc>) -> Self {
        self.fallback_date = Some(date);
        self
    }
}

/// Stateless normalizer for raw records.
pub struct DataProcessor;

impl DataProcessor {
    /// Normalize `raw` into processed points. Never fails.
    pub fn process(raw: &[RawPoint], options: &ProcessOptions) -> Vec<ProcessedPoint> {
        let fallback = options.fallback_date.unwrap_or_else(Utc::now);
        let mut fallbacks = 0usize;

        let mut out: Vec<ProcessedPoint> = raw
            .iter()
            .map(|r| {
                let x = match &options.x_accessor {
                    Some(f) => f(r).map_or(XValue::Missing, |v| XValue::from_json(&v)),
                    None => r.first_of(&X_KEYS).map_or(XValue::Missing, XValue::from_json),
                };
                let parsed = match &options.date_parser {
                    Some(p) => p(&x),
                    None => parse_date(&x),
                };
                if parsed.is_none() {
                    fallbacks += 1;
                }

                let y_raw = match &options.y_accessor {
                    Some(f) => f(r),
                    None => r.first_of(&Y_KEYS).cloned(),
                };
                let y = y_raw.as_ref().and_then(parse_number).unwrap_or(0.0);

                let group_raw = match &options.group_accessor {
                    Some(f) => f(r),
                    None => r.first_of(&GROUP_KEYS).cloned(),
                };
                let group = group_raw.as_ref().and_then(group_name).unwrap_or_else(|| DEFAULT_GROUP.to_string());

                ProcessedPoint {
                    parsed_date: parsed.unwrap_or(fallback),
                    date_valid: parsed.is_some(),
                    x,
                    y,
                    group,
                    original: r.clone(),
                }
            })
            .collect();

        if let Some(filter) = &options.filter {
            out.retain(|p| filter(p));
        }

        if options.sort {
            match &options.sort_key {
                SortKey::X => out.sort_by(compare_x),
                SortKey::Y => out.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal)),
                SortKey::Date => out.sort_by(|a, b| a.parsed_date.cmp(&b.parsed_date)),
                SortKey::Custom(cmp) => out.sort_by(|a, b| cmp(a, b)),
            }
        }

        if fallbacks > 0 {
            warn!(fallbacks, "x values without a parsable date were assigned the fallback date");
        }
        debug!(records = raw.len(), kept = out.len(), "processed chart data");
        out
    }

    /// Structural check of untyped input: must be an array of objects with numeric y values.
    pub fn validate_data(raw: &Value) -> ValidationReport {
        let Value::Array(items) = raw else {
            return ValidationReport::from_parts(vec![ValidationError::NotAnArray], Vec::new());
        };
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        if items.is_empty() {
            warnings.push(ValidationWarning::Empty);
        }
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::Object(map) => check_record(index, map, &mut errors, &mut warnings),
                _ => errors.push(ValidationError::NotAnObject { index }),
            }
        }
        ValidationReport::from_parts(errors, warnings)
    }

    /// Same checks as [`DataProcessor::validate_data`] for already-typed records.
    pub fn validate_records(raw: &[RawPoint]) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        if raw.is_empty() {
            warnings.push(ValidationWarning::Empty);
        }
        for (index, r) in raw.iter().enumerate() {
            check_record(index, r.as_map(), &mut errors, &mut warnings);
        }
        ValidationReport::from_parts(errors, warnings)
    }

    /// Parse untyped JSON records into [`RawPoint`]s after validation.
    pub fn records_from_json(raw: &Value) -> Vec<RawPoint> {
        match raw {
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_object().cloned().map(RawPoint::from))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn check_record(
    index: usize,
    map: &Map<String, Value>,
    errors: &mut Vec<ValidationError>,
    warnings: &mut Vec<ValidationWarning>,
) {
    if present(map, &X_KEYS).is_none() {
        warnings.push(ValidationWarning::MissingX { index });
    }
    match present(map, &Y_KEYS) {
        None => warnings.push(ValidationWarning::MissingY { index }),
        Some(v) if parse_number(v).is_none() => {
            errors.push(ValidationError::NonNumericY { index, value: v.to_string() })
        }
        Some(_) => {}
    }
}

fn present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| map.get(*k)).find(|v| !v.is_null())
}

fn compare_x(a: &ProcessedPoint, b: &ProcessedPoint) -> Ordering {
    match (a.x.as_number(), b.x.as_number()) {
        (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => a.parsed_date.cmp(&b.parsed_date),
    }
}

/// Finite number from a JSON number or numeric string.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn group_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Default date parser. Numbers are epoch milliseconds; text accepts common ISO-like forms.
pub fn parse_date(x: &XValue) -> Option<DateTime<Utc>> {
    match x {
        XValue::Number(n) if n.is_finite() => Utc.timestamp_millis_opt(*n as i64).single(),
        XValue::Number(_) => None,
        XValue::Date(d) => Some(*d),
        XValue::Text(s) => parse_date_str(s),
        XValue::Missing => None,
    }
}

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y", "%B %d, %Y"];

pub fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&d));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|d| Utc.from_utc_datetime(&d));
        }
    }
    // "2024-03" and bare "2024"
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|d| Utc.from_utc_datetime(&d));
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| Utc.from_utc_datetime(&d));
    }
    None
}
