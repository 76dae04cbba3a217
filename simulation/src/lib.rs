#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver wiring the world to the per-tick systems.
//!
//! The driver owns the world and runs the systems in a fixed order on every
//! active tick: sun economy, wave spawner, combat. Player intents are routed
//! to the world or to the owning system.

use std::time::Duration;

use lane_defence_core::{Command, CommandError, Event, Outcome, WorldSnapshot};
use lane_defence_system_combat::{self as combat, Combat};
use lane_defence_system_placement as placement;
use lane_defence_system_sun::{self as sun, SunEconomy};
use lane_defence_system_waves::{self as waves, WaveSpawner};
use lane_defence_world::{self as world, query, World};
use tracing::trace;

/// Owns the world and the stateful systems that advance it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    sun: SunEconomy,
    waves: WaveSpawner,
    combat: Combat,
}

impl Simulation {
    /// Creates a driver around `world` using the default system configuration.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self::with_config(world, waves::Config::default(), combat::Config::default())
    }

    /// Creates a driver around `world` using explicit system configuration.
    #[must_use]
    pub fn with_config(world: World, waves: waves::Config, combat: combat::Config) -> Self {
        Self {
            world,
            sun: SunEconomy::new(),
            waves: WaveSpawner::new(waves),
            combat: Combat::new(combat),
        }
    }

    /// Advances the battle by `dt`.
    ///
    /// Nothing happens unless the battle is active; a paused or finished
    /// battle keeps its clock and entities frozen.
    pub fn tick(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if !self.world.is_battle_active() {
            return;
        }

        let now = self.world.advance_clock(dt);
        trace!(target: "lane_defence::simulation", ?dt, ?now, "tick");
        out.push(Event::TimeAdvanced { dt, now });

        self.sun.handle(&mut self.world, dt, now, out);
        self.waves.handle(&mut self.world, now, out);
        self.combat.handle(&mut self.world, dt, now, out);
    }

    /// Routes a command to the world or to the system that owns it.
    pub fn dispatch(&mut self, command: Command, out: &mut Vec<Event>) -> Result<(), CommandError> {
        let now = self.world.now();
        match command {
            Command::Tick { dt } => {
                self.tick(dt, out);
                Ok(())
            }
            Command::PlaceAt { cell } => {
                let _ = placement::place_selected(&mut self.world, cell, now, out)?;
                Ok(())
            }
            Command::RemoveAt { cell } => {
                let _ = placement::remove_at(&mut self.world, cell, out)?;
                Ok(())
            }
            Command::CollectAt { x, y } => sun::collect_at(&mut self.world, x, y, out)
                .map(|_| ())
                .ok_or(CommandError::NothingCollected),
            lifecycle => world::apply(&mut self.world, lifecycle, out),
        }
    }

    /// Captures the read-only view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        query::snapshot(&self.world)
    }

    /// Returns a newly reached outcome exactly once.
    pub fn take_new_outcome(&mut self) -> Option<Outcome> {
        self.world.take_new_outcome()
    }

    /// Borrows the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Borrows the world for mutation.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Consumes the driver, returning the world.
    #[must_use]
    pub fn into_world(self) -> World {
        self.world
    }
}
