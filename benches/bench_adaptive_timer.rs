// benches/bench_adaptive_timer.rs
use adaptive_signal::control_system::adaptive_timer::AdaptiveTimer;
use adaptive_signal::control_system::timing_policy::TimingPolicy;
use adaptive_signal::simulation_engine::intersections::DensityWeight;
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use std::time::Duration;

fn bench_green_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("green_time");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    let timer = AdaptiveTimer::new(&TimingPolicy::default());
    let weights: Vec<DensityWeight> = (0..=100u8).map(DensityWeight::new).collect();
    let raw: Vec<u16> = (0..=1023u16).collect();

    group.bench_function("full_weight_range", |b| {
        b.iter(|| {
            for &weight in &weights {
                black_box(timer.green_time(black_box(weight)));
            }
        });
    });

    group.bench_function("raw_reading_to_green", |b| {
        b.iter(|| {
            for &reading in &raw {
                black_box(timer.green_time(DensityWeight::from_raw(black_box(reading))));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_green_time);
criterion_main!(benches);
