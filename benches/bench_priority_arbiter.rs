// benches/bench_priority_arbiter.rs
use adaptive_signal::control_system::priority_arbiter::PriorityArbiter;
use adaptive_signal::control_system::timing_policy::TimingPolicy;
use adaptive_signal::monitoring::signal_trace::SignalTrace;
use adaptive_signal::simulation_engine::clock::ManualClock;
use adaptive_signal::simulation_engine::sensors::{RandomSensor, TrafficProfile};
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BatchSize, Criterion,
    PlotConfiguration,
};
use std::time::Duration;

fn create_arbiter(seed: u64) -> PriorityArbiter<RandomSensor, ManualClock, SignalTrace> {
    let profile = TrafficProfile {
        pedestrian_probability: 0.2,
        emergency_probability: 0.05,
    };
    PriorityArbiter::new(
        &TimingPolicy::default(),
        RandomSensor::new(seed, profile),
        ManualClock::new(),
        SignalTrace::new(),
    )
}

fn bench_run_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_cycle");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    // Virtual time, so each cycle costs only the decision logic and trace recording.
    for &cycles in [50u64, 100, 200].iter() {
        group.bench_function(format!("cycles_{}", cycles), |b| {
            b.iter_batched(
                || create_arbiter(cycles),
                |mut arbiter| {
                    for _ in 0..cycles {
                        black_box(arbiter.run_cycle());
                    }
                    arbiter
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_run_cycle);
criterion_main!(benches);
