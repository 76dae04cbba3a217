#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave spawner dispatching attackers from the level's static schedule.

use std::time::Duration;

use lane_defence_core::Event;
use lane_defence_world::World;
use tracing::{debug, warn};

const DEFAULT_GATE_SPACING: Duration = Duration::from_millis(520);

/// Configuration parameters required to construct the wave spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    gate_spacing: Duration,
}

impl Config {
    /// Creates a configuration with the provided minimum spacing between dispatches.
    #[must_use]
    pub const fn new(gate_spacing: Duration) -> Self {
        Self { gate_spacing }
    }

    /// Minimum spacing between two dispatches.
    #[must_use]
    pub const fn gate_spacing(&self) -> Duration {
        self.gate_spacing
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_GATE_SPACING)
    }
}

/// System that walks the schedule cursor and spawns due attackers.
///
/// At most one entry is processed per tick, and consecutive dispatches are
/// separated by the configured gate so a backlog never floods a lane.
#[derive(Debug)]
pub struct WaveSpawner {
    gate_spacing: Duration,
}

impl Default for WaveSpawner {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl WaveSpawner {
    /// Creates a new wave spawner using the supplied configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            gate_spacing: config.gate_spacing,
        }
    }

    /// Dispatches the next schedule entry when it is due.
    pub fn handle(&mut self, world: &mut World, now: Duration, out: &mut Vec<Event>) {
        if !world.is_battle_active() || !world.waves().started {
            return;
        }

        let waves = *world.waves();
        if now < waves.gate {
            return;
        }
        let Some(entry) = world.level().spawn_table.get(waves.cursor).cloned() else {
            return;
        };
        if now.saturating_sub(waves.started_at) < entry.offset() {
            return;
        }

        let index = waves.cursor;
        {
            let state = world.waves_mut();
            state.cursor += 1;
            state.gate = now + self.gate_spacing;
        }

        let Some(definition) = world.attacker_definition(&entry.kind).cloned() else {
            warn!(
                target: "lane_defence::waves",
                index,
                kind = %entry.kind,
                "skipping schedule entry with unknown attacker type"
            );
            out.push(Event::WaveEntrySkipped {
                index,
                kind: entry.kind,
            });
            return;
        };

        let (rows, _) = world.grid_dimensions();
        let lane = entry.row.min(rows.saturating_sub(1));
        let attacker = world.factory().make_attacker(&definition, lane);
        let id = world.insert_attacker(attacker);
        world.set_status(if entry.marker {
            "Flag wave incoming"
        } else {
            "Attackers approaching"
        });

        debug!(
            target: "lane_defence::waves",
            attacker = id.get(),
            kind = %entry.kind,
            lane,
            index,
            "attacker dispatched"
        );
        out.push(Event::AttackerSpawned {
            attacker: id,
            kind: entry.kind,
            lane,
            marker: entry.marker,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gate_spacing_matches_classic_cadence() {
        assert_eq!(
            Config::default().gate_spacing(),
            Duration::from_millis(520)
        );
    }
}
