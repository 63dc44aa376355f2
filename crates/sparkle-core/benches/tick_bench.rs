use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sparkle_core::prelude::*;

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("sparkle_tick");
    for &count in &[5u32, 40, 400] {
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::new("update_draw", count), &count, |b, &count| {
            let mut rng = StdRng::seed_from_u64(0x5EED);
            let config = EffectConfig::default()
                .with_count(count)
                .with_color(ColorSpec::RandomPerParticle)
                .with_speed(3.0);
            let mut field = ParticleField::new(360.0, 120.0, &config, &mut rng);
            let sheet = SpriteSheet::ready((), 27, 7).expect("atlas");
            let mut surface = RecordingSurface::new();
            let mut time = 0.0;
            b.iter(|| {
                time += 16.7;
                field.update(black_box(time), false, &mut rng);
                field.draw(&mut surface, &sheet);
                black_box(surface.ops().len())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
