//! Headless skirmish driver.
//!
//! Builds a small battlefield, runs the combat core at a fixed step and
//! logs every combat event. A hero casts from the ability catalog on a
//! simple priority script while a warrior holds the line.
//!
//! ```text
//! RUST_LOG=debug nightfall-headless --ticks 1200 --abilities my_abilities.json
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use nightfall_core::combat::{CombatEvent, CombatSystem, FIXED_DT};
use nightfall_core::entity::{Attack, ComponentSet, Defense, Energy, EntityId, Faction, Health, Transform};
use nightfall_core::{AbilityCatalog, CombatConfig, World};

const DEFAULT_ABILITIES: &str = include_str!("../data/abilities.json");

const HEROES: Faction = Faction(1);
const HORDE: Faction = Faction(2);

/// Hero loadout, by catalog id. Indices below refer to this order.
const LOADOUT: [&str; 4] = ["magic_bolt", "frost_nova", "mace_hit", "summon_spirit"];
const BOLT: usize = 0;
const NOVA: usize = 1;
const MACE: usize = 2;
const SUMMON: usize = 3;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "nightfall-headless", version, about)]
struct Arguments {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 1800)]
    ticks: u64,

    /// Seconds per tick.
    #[arg(long, default_value_t = FIXED_DT)]
    dt: f32,

    /// Combat tunables (JSON). Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ability catalog (JSON). The bundled catalog when omitted.
    #[arg(long)]
    abilities: Option<PathBuf>,

    /// Enemies in the horde.
    #[arg(long, default_value_t = 8)]
    enemies: u32,

    /// Passive training dummies behind the horde.
    #[arg(long, default_value_t = 2)]
    dummies: u32,

    /// Ticks between hero casts.
    #[arg(long, default_value_t = 12)]
    cast_every: u64,

    /// Print every event as a JSON line on stdout.
    #[arg(long)]
    json: bool,
}

struct Skirmish {
    world: World,
    combat: CombatSystem,
    hero: EntityId,
    warrior: EntityId,
}

fn main() -> Result<()> {
    let arguments = Arguments::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = match &arguments.config {
        Some(path) => CombatConfig::load(path)
            .with_context(|| format!("loading combat config {}", path.display()))?,
        None => CombatConfig::default(),
    };
    let catalog = match &arguments.abilities {
        Some(path) => AbilityCatalog::load(path)
            .with_context(|| format!("loading ability catalog {}", path.display()))?,
        None => AbilityCatalog::from_json_str(DEFAULT_ABILITIES).context("parsing bundled ability catalog")?,
    };
    info!(abilities = catalog.len(), radius = config.collision_radius, "catalog loaded");

    let mut skirmish = setup(config, &catalog, arguments.enemies, arguments.dummies)?;
    let summary = run(&mut skirmish, &arguments)?;

    info!(
        ticks = skirmish.combat.tick(),
        clock = skirmish.combat.clock(),
        defeated = summary.defeated,
        damage = summary.damage,
        casts = summary.casts,
        "skirmish finished"
    );
    report_survivors(&skirmish.world);
    Ok(())
}

fn setup(
    config: CombatConfig,
    catalog: &AbilityCatalog,
    enemies: u32,
    dummies: u32,
) -> Result<Skirmish> {
    let mut world = World::new();
    let mut combat = CombatSystem::with_config(config);

    let hero = world.spawn(
        ComponentSet::new()
            .with(Transform::at(Vec2::new(-120.0, 0.0)))
            .with(Health::new(120.0))
            .with(Energy::new(150.0))
            .with(Defense::new(2.0))
            .with(HEROES),
    );
    let warrior = world.spawn(
        ComponentSet::new()
            .with(Transform::at(Vec2::new(60.0, 0.0)))
            .with(Health::new(220.0))
            .with(Attack::new(18.0, 45.0, 1.2))
            .with(Defense::new(6.0))
            .with(HEROES),
    );

    for i in 0..enemies {
        #[allow(clippy::cast_precision_loss)]
        let row = (i / 4) as f32;
        #[allow(clippy::cast_precision_loss)]
        let column = (i % 4) as f32;
        world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::new(90.0 + row * 30.0, (column - 1.5) * 28.0)))
                .with(Health::new(70.0))
                .with(Attack::new(7.0, 35.0, 0.8))
                .with(Defense::new(3.0))
                .with(HORDE),
        );
    }

    for i in 0..dummies {
        #[allow(clippy::cast_precision_loss)]
        let y = (i as f32 - 0.5) * 60.0;
        world.spawn(
            ComponentSet::new()
                .with(Transform::at(Vec2::new(260.0, y)))
                .with(Health::new(150.0))
                .with(Defense::new(4.0))
                .with(HORDE),
        );
    }

    let loadout = catalog
        .instantiate_all(&LOADOUT)
        .context("hero loadout references the catalog")?;
    combat.register_entity_abilities(hero, loadout);
    info!(%hero, %warrior, enemies, dummies, "battlefield ready");

    Ok(Skirmish {
        world,
        combat,
        hero,
        warrior,
    })
}

#[derive(Debug, Default)]
struct Summary {
    defeated: u32,
    damage: f32,
    casts: u32,
}

fn run(skirmish: &mut Skirmish, arguments: &Arguments) -> Result<Summary> {
    let mut summary = Summary::default();

    let cadence = arguments.cast_every.max(1);

    for tick in 0..arguments.ticks {
        if !skirmish.world.has_entity(skirmish.hero) {
            warn!("hero has fallen");
            break;
        }
        if nearest_enemy(&skirmish.world, skirmish.hero).is_none() {
            info!("horde cleared");
            break;
        }
        if tick % cadence == 0 {
            hero_turn(skirmish);
        }

        skirmish.combat.update(&mut skirmish.world, arguments.dt);

        for event in skirmish.combat.drain_events() {
            match &event {
                CombatEvent::DamageDealt { amount, .. } => summary.damage += amount,
                CombatEvent::EntityDefeated { .. } => summary.defeated += 1,
                CombatEvent::AbilityUsed { .. } => summary.casts += 1,
                CombatEvent::ProjectileExpired { .. } => {}
            }
            if arguments.json {
                println!("{}", serde_json::to_string(&event).context("serializing event")?);
            } else {
                debug!(tick = skirmish.combat.tick(), "{event}");
            }
            if let CombatEvent::EntityDefeated { entity, .. } = event {
                if entity == skirmish.warrior {
                    warn!("warrior has fallen");
                }
            }
        }
    }
    Ok(summary)
}

/// Picks at most one cast, in priority order.
fn hero_turn(skirmish: &mut Skirmish) {
    let Skirmish {
        world,
        combat,
        hero,
        warrior,
    } = skirmish;
    let hero = *hero;

    let hurt = world
        .get_component::<Health>(hero)
        .is_some_and(|health| health.fraction() < 0.6);
    if hurt && combat.use_ability(world, hero, MACE, Vec2::ZERO) {
        return;
    }

    if !world.has_entity(*warrior) {
        if let Some(spot) = position_of(world, hero) {
            if combat.use_ability(world, hero, SUMMON, spot + Vec2::new(40.0, 0.0)) {
                return;
            }
        }
    }

    let Some(target) = nearest_enemy(world, hero).and_then(|id| position_of(world, id)) else {
        return;
    };
    if crowd_around(world, target) >= 3 && combat.use_ability(world, hero, NOVA, target) {
        return;
    }
    combat.use_ability(world, hero, BOLT, target);
}

fn position_of(world: &World, id: EntityId) -> Option<Vec2> {
    world.get_component::<Transform>(id).map(|t| t.position)
}

fn horde(world: &World) -> impl Iterator<Item = (EntityId, Vec2)> + '_ {
    world.entities().filter_map(|entity| {
        let faction = entity.get_component::<Faction>()?;
        if *faction != HORDE || entity.get_component::<Health>().is_none() {
            return None;
        }
        let position = entity.get_component::<Transform>()?.position;
        Some((entity.id(), position))
    })
}

fn nearest_enemy(world: &World, from: EntityId) -> Option<EntityId> {
    let origin = position_of(world, from)?;
    horde(world)
        .min_by(|(_, a), (_, b)| a.distance_squared(origin).total_cmp(&b.distance_squared(origin)))
        .map(|(id, _)| id)
}

fn crowd_around(world: &World, point: Vec2) -> usize {
    horde(world).filter(|(_, p)| p.distance(point) <= 60.0).count()
}

fn report_survivors(world: &World) {
    for entity in world.entities() {
        let Some(health) = entity.get_component::<Health>() else {
            continue;
        };
        let side = match entity.get_component::<Faction>() {
            Some(&HEROES) => "heroes",
            Some(&HORDE) => "horde",
            _ => "neutral",
        };
        info!(
            entity = %entity.id(),
            side,
            health = health.current(),
            max = health.max(),
            "survivor"
        );
    }
}
