use barline_core::{ConfigLayer, CurveType, LayeredConfig, LineChart};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

fn gen_series(n: usize, groups: usize) -> Value {
    let mut v = Vec::with_capacity(n * groups);
    for g in 0..groups {
        for i in 0..n {
            // waveform with drift, offset per group
            let y = (i as f64 * 0.01).sin() * 10.0 + i as f64 * 0.001 + g as f64 * 5.0;
            v.push(json!({ "x": i, "y": y, "group": format!("s{g}") }));
        }
    }
    Value::Array(v)
}

fn bench_line_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_paths");
    for &n in &[1_000usize, 10_000usize] {
        for curve in [CurveType::Linear, CurveType::Monotone] {
            let layers = LayeredConfig::new().with_user(ConfigLayer { curve: Some(curve), ..Default::default() });
            let mut chart = LineChart::new(layers);
            chart.set_data(&gen_series(n, 4)).expect("valid data");
            group.bench_with_input(BenchmarkId::from_parameter(format!("n{n}_{curve:?}")), &chart, |b, chart| {
                b.iter(|| black_box(chart.geometry().calculate_line_paths()));
            });
        }
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut chart = LineChart::new(LayeredConfig::new());
    chart.set_data(&gen_series(10_000, 4)).expect("valid data");
    c.bench_function("find_data_at_position_10k", |b| {
        b.iter(|| black_box(chart.geometry().find_data_at_position(black_box(360.0), black_box(170.0))));
    });
}

fn bench_set_data(c: &mut Criterion) {
    let data = gen_series(10_000, 4);
    c.bench_function("set_data_40k", |b| {
        b.iter(|| {
            let mut chart = LineChart::new(LayeredConfig::new());
            chart.set_data(black_box(&data)).expect("valid data");
            black_box(chart.state().scales().inner_width)
        });
    });
}

criterion_group!(benches, bench_line_paths, bench_hit_test, bench_set_data);
criterion_main!(benches);
