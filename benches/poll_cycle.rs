use cncsnap_core::{CollectorConfig, PollConfig, PollCoordinator};
use cncsnap_sources::{builtin_registry, SimulatedDevice};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::atomic::AtomicBool;

fn coordinator(configs: &[CollectorConfig]) -> PollCoordinator {
    let collectors = builtin_registry().build(configs).unwrap();
    PollCoordinator::new(collectors, &PollConfig::default())
}

fn bench_poll_cycle(c: &mut Criterion) {
    let cancel = AtomicBool::new(false);

    c.bench_function("cycle_default_collectors", |b| {
        let mut device = SimulatedDevice::new();
        let mut coord = coordinator(&CollectorConfig::default_list());
        b.iter(|| {
            let report = coord.run_cycle(&mut device, &cancel).unwrap();
            black_box(report.updates.len());
        })
    });

    c.bench_function("cycle_idle_machine", |b| {
        let mut device = SimulatedDevice::new();
        device.state_mut().motion = false;
        let configs: Vec<CollectorConfig> = ["identifier", "raw_status", "execution", "dynamic"]
            .into_iter()
            .map(CollectorConfig::new)
            .collect();
        let mut coord = coordinator(&configs);
        b.iter(|| {
            let report = coord.run_cycle(&mut device, &cancel).unwrap();
            black_box(report.updates.len());
        })
    });
}

criterion_group!(benches, bench_poll_cycle);
criterion_main!(benches);
