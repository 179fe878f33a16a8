//! Turn resolution throughput.
//!
//! Run with: cargo bench --bench turn
//!
//! This will generate HTML reports in target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use broadside::{Coord, Mine, RumBarrel, Ship, ShipOrder, Side, World, MAP_HEIGHT, MAP_WIDTH};

/// World with `per_side` ships a side in two facing columns.
fn create_battle(per_side: usize) -> World {
    let allies = (0..per_side)
        .map(|i| Ship::new(2 * i as u32, Coord::new(3, 3 + 5 * i as i32), 0, Side::Ally))
        .collect::<Vec<_>>();
    let enemies = (0..per_side)
        .map(|i| Ship::new(2 * i as u32 + 1, Coord::new(19, 3 + 5 * i as i32), 3, Side::Enemy))
        .collect::<Vec<_>>();
    let barrels = (0..8)
        .map(|i| RumBarrel::new(Coord::new(7 + i, 2 * i + 3), 10 + i as u32))
        .collect();
    let mines = (0..4).map(|i| Mine::new(Coord::new(11, 4 * i + 3))).collect();

    World::new(per_side, barrels, vec![], mines, allies, enemies)
}

fn random_orders(rng: &mut StdRng, fleet: &[Ship]) -> Vec<ShipOrder> {
    fleet
        .iter()
        .map(|_| match rng.gen_range(0..7) {
            0 => ShipOrder::wait(),
            1 => ShipOrder::faster(),
            2 => ShipOrder::slower(),
            3 => ShipOrder::port(),
            4 => ShipOrder::starboard(),
            5 => ShipOrder::mine(),
            _ => ShipOrder::fire(Coord::new(
                rng.gen_range(0..MAP_WIDTH),
                rng.gen_range(0..MAP_HEIGHT),
            )),
        })
        .collect()
}

fn bench_single_turn(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_turn");

    for per_side in [1usize, 2, 3].iter() {
        let world = create_battle(*per_side);
        let mut rng = StdRng::seed_from_u64(42);
        let ally = random_orders(&mut rng, world.my_ships());
        let enemy = random_orders(&mut rng, world.enemy_ships());

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_ships_a_side", per_side)),
            per_side,
            |b, _| {
                b.iter(|| {
                    let mut branch = world.copy();
                    branch.prepare();
                    let _ = branch.set_actions(Side::Ally, &ally);
                    let _ = branch.set_actions(Side::Enemy, &enemy);
                    let result = branch.update();
                    black_box((branch, result))
                });
            },
        );
    }

    group.finish();
}

fn bench_rollout(c: &mut Criterion) {
    let world = create_battle(3);

    c.bench_function("rollout_20_turns", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut branch = world.copy();
            for _ in 0..20 {
                branch.prepare();
                let ally = random_orders(&mut rng, branch.my_ships());
                let enemy = random_orders(&mut rng, branch.enemy_ships());
                let _ = branch.set_actions(Side::Ally, &ally);
                let _ = branch.set_actions(Side::Enemy, &enemy);
                if branch.update().is_err() {
                    break;
                }
            }
            black_box(branch.state_hash())
        });
    });
}

fn bench_copy_and_hash(c: &mut Criterion) {
    let world = create_battle(3);

    c.bench_function("world_copy", |b| b.iter(|| black_box(world.copy())));
    c.bench_function("state_hash", |b| b.iter(|| black_box(world.state_hash())));
}

criterion_group!(benches, bench_single_turn, bench_rollout, bench_copy_and_hash);
criterion_main!(benches);
