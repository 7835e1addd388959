// File: crates/barline-demo/src/main.rs
// Summary: Demo loads a CSV file and writes a line or bar chart as SVG (and PNG with the `skia` feature).

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use barline_core::{BarChart, ConfigLayer, LayeredConfig, LineChart, Orientation, Size};
use barline_demo::{bar_svg, line_svg, load_csv, ColumnMap};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Kind {
    #[default]
    Line,
    Bar,
}

#[derive(Parser, Debug)]
#[command(name = "barline-demo", version, about = "Render a CSV file as a line or bar chart")]
struct Args {
    /// CSV file with a header row
    #[arg(short, long)]
    input: PathBuf,

    #[arg(long, value_enum, default_value = "line")]
    kind: Kind,

    /// TOML file with configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in preset (default, compact, presentation, dark, high-contrast)
    #[arg(long)]
    preset: Option<String>,

    /// Output SVG path; defaults to target/out/<input stem>_<kind>.svg
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    width: Option<f64>,

    #[arg(long)]
    height: Option<f64>,

    /// Column holding x values
    #[arg(long)]
    x_column: Option<String>,

    /// Column holding y values
    #[arg(long)]
    y_column: Option<String>,

    /// Column holding series names
    #[arg(long)]
    group_column: Option<String>,

    #[arg(long)]
    stacked: bool,

    #[arg(long)]
    grouped: bool,

    #[arg(long)]
    horizontal: bool,

    /// Fit a bar chart into a container this wide using the responsive policy
    #[arg(long)]
    container_width: Option<f64>,

    /// Also write a PNG next to the SVG
    #[arg(long)]
    png: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("barline_core={level},barline_demo={level}")));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let layers = build_layers(&args)?;
    let columns = ColumnMap { x: args.x_column.clone(), y: args.y_column.clone(), group: args.group_column.clone() };
    let data = load_csv(&args.input, &columns)?;

    let output = args.output.clone().unwrap_or_else(|| default_output(&args.input, args.kind));
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }

    let svg = match args.kind {
        Kind::Line => {
            let mut chart = LineChart::new(layers);
            report(chart.set_data(&data)?);
            write_png(&args, &output, &chart)?;
            line_svg(&chart)
        }
        Kind::Bar => {
            let mut chart = BarChart::new(layers);
            report(chart.set_data(&data)?);
            if let Some(w) = args.container_width {
                let now = Instant::now();
                let height = args.height.unwrap_or(chart.config().height);
                chart.observe_container(Size::new(w, height), now);
                let settle = Duration::from_millis(chart.config().responsive.debounce_ms);
                if let Some(layout) = chart.poll_resize(now + settle) {
                    info!(bar_width = layout.bar_width, overflow = layout.overflow, chart_width = layout.chart_width, "responsive layout");
                }
            }
            write_bar_png(&args, &output, &chart)?;
            bar_svg(&chart)
        }
    };
    std::fs::write(&output, svg).with_context(|| format!("writing {}", output.display()))?;
    info!(path = %output.display(), "wrote svg");
    Ok(())
}

fn build_layers(args: &Args) -> Result<LayeredConfig> {
    let mut layers = LayeredConfig::new();
    if let Some(name) = &args.preset {
        layers.set_preset(name)?;
    }
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let layer = ConfigLayer::from_toml_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        layers.apply_user(&layer);
    }
    // Flags win over the config file.
    layers.apply_user(&ConfigLayer {
        width: args.width,
        height: args.height,
        stacked: args.stacked.then_some(true),
        grouped: args.grouped.then_some(true),
        orientation: args.horizontal.then_some(Orientation::Horizontal),
        ..Default::default()
    });
    Ok(layers)
}

fn report(warnings: Vec<barline_core::ValidationWarning>) {
    for w in warnings {
        warn!("{w}");
    }
}

/// target/out/<stem>_<kind>.svg
fn default_output(input: &Path, kind: Kind) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    let kind = match kind {
        Kind::Line => "line",
        Kind::Bar => "bar",
    };
    PathBuf::from("target/out").join(format!("{stem}_{kind}.svg"))
}

#[cfg(feature = "skia")]
fn write_png(args: &Args, output: &Path, chart: &LineChart) -> Result<()> {
    if args.png {
        let bytes = barline_core::render::render_line_png(chart, &Default::default())?;
        barline_core::render::write_png(output.with_extension("png"), &bytes)?;
    }
    Ok(())
}

#[cfg(feature = "skia")]
fn write_bar_png(args: &Args, output: &Path, chart: &BarChart) -> Result<()> {
    if args.png {
        let bytes = barline_core::render::render_bar_png(chart, &Default::default())?;
        barline_core::render::write_png(output.with_extension("png"), &bytes)?;
    }
    Ok(())
}

#[cfg(not(feature = "skia"))]
fn write_png(args: &Args, _output: &Path, _chart: &LineChart) -> Result<()> {
    if args.png {
        warn!("built without the `skia` feature; skipping PNG");
    }
    Ok(())
}

#[cfg(not(feature = "skia"))]
fn write_bar_png(args: &Args, _output: &Path, _chart: &BarChart) -> Result<()> {
    if args.png {
        warn!("built without the `skia` feature; skipping PNG");
    }
    Ok(())
}
