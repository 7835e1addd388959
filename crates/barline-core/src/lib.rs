// File: crates/barline-core/src/lib.rs
// Summary: Core library entry point; exports the public API for line and bar chart geometry.

pub mod axis;
pub mod bar;
pub mod chart;
pub mod config;
pub mod curve;
pub mod data;
pub mod error;
pub mod event;
pub mod geometry;
pub mod ids;
pub mod legend;
pub mod line;
pub mod palette;
pub mod path;
pub mod responsive;
pub mod scale;
pub mod state;
pub mod trend;
pub mod types;

#[cfg(feature = "skia")]
pub mod render;

pub use axis::{Axes, Axis, Tick};
pub use bar::{BarGeometry, BarPosition};
pub use chart::{BarChart, BarFrame, LineChart, LineFrame};
pub use config::{BarMode, ChartConfig, ChartKind, ConfigLayer, LayeredConfig};
pub use curve::CurveType;
pub use data::{DataProcessor, ProcessOptions, ProcessedPoint, RawPoint, SortKey, XValue};
pub use error::{ChartError, Result, ValidationError, ValidationReport, ValidationWarning};
pub use event::{ChartEvent, EventKind, HitTarget};
pub use geometry::{RectF, ScreenPoint};
pub use ids::{ChartInstanceId, ElementKind};
pub use legend::{LegendEntry, LegendItem, LegendOptions};
pub use line::{DataCoordinate, DotPosition, LineGeometry};
pub use palette::Rgba;
pub use responsive::{compute_layout, Debouncer, ResizeController, ResponsiveConfig, ResponsiveLayout};
pub use scale::{ScaleBundle, ScaleManager, ScaleType};
pub use state::{BarChartState, LineChartState, SeriesIndex};
pub use trend::{Indicator, TrendConfig, TrendSegment};
pub use types::{AxisPosition, Margins, Orientation, Size};
