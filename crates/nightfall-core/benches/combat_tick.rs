use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use nightfall_core::ability::{Ability, AbilityEffect};
use nightfall_core::combat::{CombatSystem, FIXED_DT};
use nightfall_core::entity::{
    Attack, ComponentSet, Defense, EntityId, Faction, Health, TrajectoryProjectile, Transform,
};
use nightfall_core::world::World;

/// A grid of armored targets with a melee line in front of them.
fn battlefield(targets: usize) -> World {
    let mut world = World::new();
    for i in 0..targets {
        let x = (i % 20) as f32 * 30.0;
        let y = (i / 20) as f32 * 30.0;
        world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::new(x, y)))
                .with(Health::new(1.0e9))
                .with(Defense::new(2.0))
                .with(Faction(2)),
        );
    }
    for i in 0..targets / 4 {
        let x = (i % 20) as f32 * 30.0 + 5.0;
        world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::new(x, -10.0)))
                .with(Health::new(1.0e9))
                .with(Attack::new(5.0, 20.0, 2.0))
                .with(Faction(1)),
        );
    }
    world
}

fn bench_tick_with_projectiles(c: &mut Criterion) {
    let mut world = battlefield(200);
    // Long-lived projectiles flying below the grid.
    for i in 0..200 {
        let y = -200.0 - i as f32;
        world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::new(0.0, y)))
                .with(TrajectoryProjectile::new(Vec2::new(10.0, 0.0), 1.0e6, 1.0))
                .with(Faction(1)),
        );
    }
    let mut combat = CombatSystem::new();

    c.bench_function("tick_200_targets_200_projectiles", |b| {
        b.iter(|| {
            combat.update(black_box(&mut world), FIXED_DT);
            black_box(combat.drain_events().len())
        });
    });
}

fn bench_melee_only(c: &mut Criterion) {
    let mut world = battlefield(400);
    let mut combat = CombatSystem::new();

    c.bench_function("tick_400_targets_melee", |b| {
        b.iter(|| {
            combat.update(black_box(&mut world), FIXED_DT);
            black_box(combat.drain_events().len())
        });
    });
}

fn bench_area_cast(c: &mut Criterion) {
    let mut world = battlefield(100);
    let caster: EntityId = world.spawn(
        ComponentSet::new()
            .with(Transform::at(Vec2::new(300.0, 150.0)))
            .with(Health::new(100.0))
            .with(Faction(1)),
    );
    let mut combat = CombatSystem::new();
    let nova = Ability::new(
        "nova",
        0.0,
        0.0,
        AbilityEffect::AreaEffect {
            count: 16,
            speed: 200.0,
            lifetime: 0.5,
            damage: 3.0,
        },
    );
    combat.register_entity_abilities(caster, vec![nova]);

    c.bench_function("cast_nova_and_resolve", |b| {
        b.iter(|| {
            combat.use_ability(&mut world, caster, 0, Vec2::ZERO);
            for _ in 0..30 {
                combat.update(&mut world, FIXED_DT);
            }
            black_box(combat.drain_events().len())
        });
    });
}

criterion_group!(benches, bench_tick_with_projectiles, bench_melee_only, bench_area_cast);
criterion_main!(benches);
