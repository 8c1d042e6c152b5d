use criterion::{Criterion, black_box, criterion_group, criterion_main};

use glimmer_lighting::{FovProvider, LightingEngine, LightingOptions};

struct OpenFov;

impl FovProvider for OpenFov {
    fn compute(&mut self, x: i32, y: i32, range: i32, visit: &mut dyn FnMut(i32, i32, f64, f64)) {
        for dy in -range..=range {
            for dx in -range..=range {
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                if d <= range as f64 {
                    visit(x + dx, y + dy, d, 1.0);
                }
            }
        }
    }
}

fn engine(passes: u32) -> LightingEngine {
    let opts = LightingOptions::default().with_passes(passes).with_range(12);
    let mut engine = LightingEngine::new(|_: i32, _: i32| 0.3, OpenFov, opts);
    for i in 0..8 {
        engine.set_light(i * 9, (i % 3) * 7, [255, 200, 120]).unwrap();
    }
    engine
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");
    for passes in [1u32, 2, 3] {
        let mut warm = engine(passes);
        group.bench_function(format!("warm_cache_{passes}_passes"), |b| {
            b.iter(|| black_box(warm.compute_map().len()))
        });
        let mut cold = engine(passes);
        group.bench_function(format!("cold_cache_{passes}_passes"), |b| {
            b.iter(|| {
                cold.reset();
                black_box(cold.compute_map().len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
