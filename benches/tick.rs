use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cubesnake_core::model::{Model, ModelConfig};
use cubesnake_core::types::TickInstruments;

#[derive(Debug)]
struct Instruments {}

impl TickInstruments for Instruments {
    fn observe_tick(&self, _: std::time::Duration) {}
}

fn bench_straight_ticks(c: &mut Criterion) {
    c.bench_function("straight line ticks", |b| {
        b.iter(|| {
            let mut model = Model::new(ModelConfig {
                seed: Some(11),
                ..ModelConfig::default()
            })
            .unwrap();
            let instruments = Instruments {};
            for _ in 0..64 {
                model.update(0.5, &instruments);
                if model.is_game_over() {
                    break;
                }
            }
            black_box(model.stats().ticks)
        })
    });
}

criterion_group!(benches, bench_straight_ticks);
criterion_main!(benches);
