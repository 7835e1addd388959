// File: crates/barline-demo/src/input.rs
// Summary: Load CSV rows as JSON records the chart core can validate and process.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Number, Value};
use tracing::{debug, info};

/// Optional renames from CSV headers to the record keys `x`, `y` and `group`.
#[derive(Clone, Debug, Default)]
pub struct ColumnMap {
    pub x: Option<String>,
    pub y: Option<String>,
    pub group: Option<String>,
}

impl ColumnMap {
    fn key_for<'a>(&self, header: &'a str) -> &'a str {
        let is = |want: &Option<String>| want.as_deref().is_some_and(|w| w.eq_ignore_ascii_case(header));
        if is(&self.x) {
            "x"
        } else if is(&self.y) {
            "y"
        } else if is(&self.group) {
            "group"
        } else {
            header
        }
    }
}

pub fn load_csv(path: &Path, columns: &ColumnMap) -> Result<Value> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let records = read_csv(file, columns).with_context(|| format!("reading {}", path.display()))?;
    info!(path = %path.display(), rows = records.as_array().map_or(0, Vec::len), "loaded csv");
    Ok(records)
}

/// Headers are lowercased. Numeric-looking cells become JSON numbers and
/// empty cells are left out so the core sees them as missing.
pub fn read_csv<R: Read>(reader: R, columns: &ColumnMap) -> Result<Value> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect();
    debug!(?headers, "csv headers");

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let mut obj = Map::new();
        for (h, cell) in headers.iter().zip(rec.iter()) {
            if cell.is_empty() {
                continue;
            }
            obj.insert(columns.key_for(h).to_string(), cell_value(cell));
        }
        out.push(Value::Object(obj));
    }
    Ok(Value::Array(out))
}

fn cell_value(s: &str) -> Value {
    match s.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_cells_become_numbers() {
        let csv = "Month,Sales,Region\nJan,12.5,north\nFeb,,south\n";
        let cols = ColumnMap { x: Some("month".into()), y: Some("sales".into()), group: Some("region".into()) };
        let v = read_csv(csv.as_bytes(), &cols).expect("csv");
        assert_eq!(v, json!([{ "x": "Jan", "y": 12.5, "group": "north" }, { "x": "Feb", "group": "south" }]));
    }

    #[test]
    fn nan_stays_text() {
        assert_eq!(cell_value("NaN"), json!("NaN"));
        assert_eq!(cell_value("2024-01-01"), json!("2024-01-01"));
    }
}
