use barline_core::{BarChart, ConfigLayer, LayeredConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

fn gen_categories(categories: usize, groups: usize) -> Value {
    let mut v = Vec::with_capacity(categories * groups);
    for c in 0..categories {
        for g in 0..groups {
            // alternate signs so both stack accumulators are exercised
            let y = ((c * 7 + g * 13) % 50) as f64 - 10.0;
            v.push(json!({ "x": format!("c{c}"), "y": y, "group": format!("g{g}") }));
        }
    }
    Value::Array(v)
}

fn bench_bar_positions(c: &mut Criterion) {
    let mut group = c.benchmark_group("bar_positions");
    for &(cats, groups) in &[(50usize, 4usize), (500, 8)] {
        for (mode, layer) in [
            ("grouped", ConfigLayer { grouped: Some(true), ..Default::default() }),
            ("stacked", ConfigLayer { stacked: Some(true), ..Default::default() }),
        ] {
            let mut chart = BarChart::new(LayeredConfig::new().with_user(layer));
            chart.set_data(&gen_categories(cats, groups)).expect("valid data");
            group.bench_with_input(BenchmarkId::from_parameter(format!("{mode}_c{cats}_g{groups}")), &chart, |b, chart| {
                b.iter(|| black_box(chart.geometry().calculate_bar_positions()));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_bar_positions);
criterion_main!(benches);
