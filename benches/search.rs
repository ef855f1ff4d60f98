//! Benchmarks for the disaggregation search.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use nialm::evolution::{Individual, Population, SearchRng};
use nialm::{DisaggConfig, DisaggProblem, Series};

/// A flat signal carrying `pulses` non-overlapping 500 W / 600 s pulses.
fn pulse_signal(pulses: usize) -> Series {
    let mut values = vec![0.0; pulses * 700 + 100];
    for p in 0..pulses {
        let start = 50 + p * 700;
        for v in values.iter_mut().take(start + 600).skip(start) {
            *v = 500.0;
        }
    }
    Series::from_uniform(0, 1, values).unwrap()
}

fn bench_individual_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("individual_growth");

    for pulses in [1, 4, 16] {
        let config = DisaggConfig::default();
        let problem = DisaggProblem::new(pulse_signal(pulses), &config).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_pulses", pulses)),
            &pulses,
            |b, _| {
                let mut seed = 0u64;
                b.iter(|| {
                    seed += 1;
                    Individual::grow(black_box(&problem), Vec::new(), seed)
                });
            },
        );
    }

    group.finish();
}

fn bench_generation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_step");
    group.sample_size(10);

    for size in [20, 50] {
        let config = DisaggConfig {
            population_size: size,
            breeding_fraction: 0.2,
            ..Default::default()
        };
        let problem = DisaggProblem::new(pulse_signal(4), &config).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("pop_{}", size)),
            &size,
            |b, _| {
                let mut rng = SearchRng::new(42);
                let mut population = Population::new(&problem, size, &mut rng);
                b.iter(|| {
                    population.evolve(black_box(&problem), &config, &mut rng);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_individual_growth, bench_generation_step);
criterion_main!(benches);
