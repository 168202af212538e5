use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use lightway::sampling::{generate_particle_field, SurfaceSampler};
use lightway::scene::mesh_gen::uv_sphere;
use lightway::streaks::{generate_streak_field, StreakParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn streak_field_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("streak_field");
    for count in [250_u32, 2_500, 25_000] {
        let params = StreakParams {
            count,
            ..StreakParams::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(count), &params, |b, params| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| black_box(generate_streak_field(black_box(params), &mut rng)));
        });
    }
    group.finish();
}

fn particle_sampling_benchmark(c: &mut Criterion) {
    let sphere = uv_sphere(1.0, 64, 32);
    let positions: Vec<[f32; 3]> = sphere.vertices.iter().map(|v| v.position).collect();
    let Some(sampler) = SurfaceSampler::new(&positions, &sphere.indices) else {
        return;
    };

    c.bench_function("surface_sampler_build", |b| {
        b.iter(|| black_box(SurfaceSampler::new(black_box(&positions), black_box(&sphere.indices))));
    });

    let mut group = c.benchmark_group("particle_field");
    for count in [2_000_u32, 20_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = StdRng::seed_from_u64(2);
            b.iter(|| black_box(generate_particle_field(&sampler, count, &mut rng)));
        });
    }
    group.finish();
}

criterion_group!(benches, streak_field_benchmark, particle_sampling_benchmark);
criterion_main!(benches);
