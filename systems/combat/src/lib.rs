#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Combat resolution for Lane Defence.
//!
//! A tick runs the sub-phases in a fixed order: defender abilities,
//! projectiles, attacker movement and melee, boundary guards, effect decay
//! and pruning, then the win check. Damage is applied through the world so a
//! reward is credited exactly once, at the hit that crosses the kill
//! threshold.

use std::time::Duration;

use lane_defence_core::{Event, Outcome};
use lane_defence_world::World;
use tracing::debug;

mod abilities;
mod guards;
mod melee;
mod projectiles;

/// Decorative lifetimes and fallbacks used while resolving combat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Projectile speed used when a ranged type declares a non-positive one.
    pub default_projectile_speed: f32,
    /// Lifetime of the muzzle flash.
    pub muzzle_effect: Duration,
    /// Lifetime of a projectile impact spark.
    pub hit_effect: Duration,
    /// Lifetime of a bite mark.
    pub bite_effect: Duration,
    /// Lifetime of an area burst explosion.
    pub area_explosion_effect: Duration,
    /// Lifetime of a proximity mine explosion.
    pub mine_explosion_effect: Duration,
    /// Lifetime of the dust left by a launched guard.
    pub guard_launch_effect: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_projectile_speed: 240.0,
            muzzle_effect: Duration::from_millis(90),
            hit_effect: Duration::from_millis(120),
            bite_effect: Duration::from_millis(180),
            area_explosion_effect: Duration::from_millis(420),
            mine_explosion_effect: Duration::from_millis(320),
            guard_launch_effect: Duration::from_millis(260),
        }
    }
}

/// Combat system resolving abilities, projectiles, melee, guards and outcomes.
#[derive(Debug)]
pub struct Combat {
    config: Config,
}

impl Default for Combat {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Combat {
    /// Creates a new combat system using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves one combat tick.
    pub fn handle(&mut self, world: &mut World, dt: Duration, now: Duration, out: &mut Vec<Event>) {
        if !world.is_battle_active() {
            return;
        }

        abilities::resolve(&self.config, world, now, out);
        projectiles::advance(&self.config, world, dt, out);
        melee::advance(&self.config, world, dt, now, out);
        guards::sweep(world, dt, out);
        decay_and_prune(world, dt);
        check_win(world, out);
    }
}

fn decay_and_prune(world: &mut World, dt: Duration) {
    world.decay_effects(dt);
    for id in world.defender_ids() {
        if let Some(defender) = world.defender_mut(id) {
            defender.hurt = defender.hurt.saturating_sub(dt);
        }
    }
    let pruned = world.prune_dead_attackers();
    if pruned > 0 {
        debug!(target: "lane_defence::combat", pruned, "dead attackers pruned");
    }
    world.decay_screen_shake(dt);
}

fn check_win(world: &mut World, out: &mut Vec<Event>) {
    if !world.is_battle_active() {
        return;
    }
    let waves = world.waves();
    let exhausted = waves.started && waves.cursor >= world.level().spawn_table.len();
    if exhausted && world.attackers().next().is_none() {
        let _ = world.record_outcome(Outcome::Win, out);
    }
}
