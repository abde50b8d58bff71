use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, LevelFilter, SimpleLogger};
use spotsim::{FluxModel, LightCurveSim, SpotConfig, SpotField};

fn simulate_benchmark(c: &mut Criterion) {
    let _ = SimpleLogger::init(LevelFilter::Warn, Config::default());

    let mut group = c.benchmark_group("simulate");
    group.sample_size(10);

    let sim = LightCurveSim::new(10.0, 0.01)
        .with_visits(900)
        .with_span_years(10.0)
        .with_amplitude(0.1);
    group.bench_function("pipeline 900 visits over 10 years", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(42);
            sim.simulate(&mut rng).unwrap()
        })
    });

    let mut rng = StdRng::seed_from_u64(42);
    let field = SpotField::generate(&SpotConfig::default(), 3650.0, &mut rng);
    let times = Array1::random_using(900, Uniform::new(0.0, 3650.0), &mut rng);
    group.bench_function("synthesize 900 samples", |b| {
        b.iter(|| FluxModel::synthesize(&field, times.view(), 1.0))
    });
}

criterion_group!(benches, simulate_benchmark);
criterion_main!(benches);
