use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use snake::{EngineSettings, FoodField, Grid, Position, SimulationEngine, TickResult};

fn bench_tick(c: &mut Criterion) {
    let mut engine = SimulationEngine::with_seed(EngineSettings::default(), 12345);

    c.bench_function("engine_tick", |b| {
        b.iter(|| {
            if let TickResult::GameOver { .. } = black_box(engine.tick()) {
                engine.reset();
            }
        })
    });
}

fn bench_populate(c: &mut Criterion) {
    let grid = Grid::new(20, 20).unwrap();
    let occupied: HashSet<Position> = (0..200).map(|i| Position::new(i % 20, i / 20)).collect();

    c.bench_function("food_ensure_populated", |b| {
        b.iter(|| {
            let mut field = FoodField::new(grid, 7);
            field.ensure_populated(black_box(&occupied))
        })
    });
}

criterion_group!(benches, bench_tick, bench_populate);
criterion_main!(benches);
