use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use qmas_core::core::rng::seeded;
use qmas_core::{ArenaConfig, BehaviorConfig, Environment, Swarm, SwarmConfig};
use std::time::Duration;

fn bench_epoch(c: &mut Criterion) {
    let mut group = c.benchmark_group("epoch");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let steps: usize = std::env::var("QMAS_BENCH_STEPS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(100);

    for &agents in &[50_usize, 100, 200] {
        group.bench_function(format!("steps{}_agents{}", steps, agents), |b| {
            b.iter_batched(
                || {
                    let mut rng = seeded(0xBEEF);
                    let env = Environment::new(&ArenaConfig::default(), &mut rng)
                        .expect("default arena is valid");
                    let config = SwarmConfig {
                        agent_count: agents,
                        ..SwarmConfig::default()
                    };
                    let swarm = Swarm::new(&config, &BehaviorConfig::default(), 500.0, &mut rng)
                        .expect("default swarm is valid");
                    (env, swarm, rng)
                },
                |(mut env, mut swarm, mut rng)| swarm.run_epoch(&mut env, steps, false, &mut rng),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_epoch);
criterion_main!(benches);
