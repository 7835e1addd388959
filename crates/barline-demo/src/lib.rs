// File: crates/barline-demo/src/lib.rs
// Summary: CSV loading and SVG output used by the demo binary.

pub mod input;
pub mod svg;

pub use input::{load_csv, read_csv, ColumnMap};
pub use svg::{bar_svg, line_svg};
