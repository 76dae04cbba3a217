//! Scripted headless battles.
//!
//! The runner stands in for a player: it plants the cards listed in the level
//! script once their time arrives, clicks every sun token on the board each
//! tick and advances the simulation at a fixed cadence.

use std::{collections::VecDeque, time::Duration};

use lane_defence_core::{CellCoord, Command, CommandError, DefenderKind, Event, IntentError, Outcome};
use lane_defence_simulation::Simulation;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Single planting step of a level script.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct ScriptedPlacement {
    pub(crate) at_ms: u64,
    pub(crate) row: u32,
    pub(crate) col: u32,
    pub(crate) card: DefenderKind,
}

impl ScriptedPlacement {
    fn due_at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }

    fn cell(&self) -> CellCoord {
        CellCoord::new(self.row, self.col)
    }
}

/// Cadence and cut-off of a headless run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunConfig {
    pub(crate) tick: Duration,
    pub(crate) limit: Duration,
}

/// Summary of a finished run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub(crate) outcome: Option<Outcome>,
    pub(crate) elapsed: Duration,
    pub(crate) planted: usize,
    pub(crate) dropped: usize,
    pub(crate) collected: u32,
    pub(crate) spawned: usize,
    pub(crate) kills: usize,
}

impl RunReport {
    fn observe(&mut self, event: &Event) {
        match event {
            Event::DefenderPlaced { kind, cell, .. } => {
                self.planted += 1;
                debug!(%kind, row = cell.row(), col = cell.column(), "planted");
            }
            Event::SunCollected { value, .. } => self.collected += value,
            Event::AttackerSpawned { kind, lane, .. } => {
                self.spawned += 1;
                debug!(%kind, lane, "attacker entered");
            }
            Event::AttackerKilled { .. } => self.kills += 1,
            Event::GuardTriggered { lane } => info!(lane, "guard launched"),
            _ => {}
        }
    }
}

/// Starts a battle on `simulation` and plays `script` until the battle ends
/// or the configured limit elapses.
pub(crate) fn run(
    simulation: &mut Simulation,
    script: &[ScriptedPlacement],
    config: RunConfig,
) -> Result<RunReport, CommandError> {
    let mut events = Vec::new();
    simulation.dispatch(Command::OpenLevelSelect, &mut events)?;
    simulation.dispatch(Command::StartBattle, &mut events)?;

    let mut pending: VecDeque<_> = {
        let mut ordered = script.to_vec();
        ordered.sort_by_key(|placement| placement.at_ms);
        ordered.into()
    };
    let mut report = RunReport::default();
    let tick = if config.tick.is_zero() {
        Duration::from_millis(16)
    } else {
        config.tick
    };

    while simulation.world().now() < config.limit {
        plant_due(simulation, &mut pending, &mut report, &mut events);
        collect_all(simulation, &mut events);
        simulation.tick(tick, &mut events);

        for event in events.drain(..) {
            report.observe(&event);
        }
        if let Some(outcome) = simulation.take_new_outcome() {
            report.outcome = Some(outcome);
            break;
        }
    }

    report.elapsed = simulation.world().now();
    Ok(report)
}

fn plant_due(
    simulation: &mut Simulation,
    pending: &mut VecDeque<ScriptedPlacement>,
    report: &mut RunReport,
    events: &mut Vec<Event>,
) {
    let now = simulation.world().now();
    while let Some(placement) = pending.front() {
        if placement.due_at() > now {
            return;
        }

        let result = plant(simulation, placement, events);

        match result {
            Ok(()) => {}
            // Retried on a later tick, keeping script order.
            Err(CommandError::Intent(
                IntentError::InsufficientResource | IntentError::CoolingDown,
            )) => return,
            Err(error) => {
                warn!(card = %placement.card, row = placement.row, col = placement.col, %error, "dropping scripted placement");
                report.dropped += 1;
            }
        }
        let _ = pending.pop_front();
    }
}

fn plant(
    simulation: &mut Simulation,
    placement: &ScriptedPlacement,
    events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    simulation.dispatch(Command::ClearSelection, events)?;
    simulation.dispatch(
        Command::SelectCard {
            kind: placement.card.clone(),
        },
        events,
    )?;
    simulation.dispatch(
        Command::PlaceAt {
            cell: placement.cell(),
        },
        events,
    )
}

fn collect_all(simulation: &mut Simulation, events: &mut Vec<Event>) {
    let pointers: Vec<_> = simulation
        .snapshot()
        .sun_tokens
        .iter()
        .map(|token| (token.x, token.y))
        .collect();
    for (x, y) in pointers {
        let _ = simulation.dispatch(Command::CollectAt { x, y }, events);
    }
}

#[cfg(test)]
mod tests {
    use lane_defence_core::{
        AbilityKind, AttackerDefinition, AttackerKind, DefenderDefinition, LevelConfig,
        Progress, Settings, WaveEntry,
    };
    use lane_defence_world::World;

    use super::*;

    fn simulation(spawn_table: Vec<WaveEntry>, initial_sun: u32) -> Simulation {
        Simulation::new(World::new(
            LevelConfig {
                id: String::from("t-1"),
                rows: 5,
                columns: 9,
                initial_sun,
                waves: 1,
                spawn_table,
            },
            vec![DefenderDefinition {
                id: DefenderKind::new("peashooter"),
                name: String::from("Peashooter"),
                cost: 100,
                cooldown_ms: 7_500,
                hp: 300.0,
                attack: 20.0,
                interval_ms: 1_400,
                projectile_speed: Some(260.0),
                ability: AbilityKind::None,
                ability_ms: None,
            }],
            vec![AttackerDefinition {
                id: AttackerKind::new("normal"),
                hp: 270.0,
                speed: 18.0,
                dps: 36.0,
                reward: 0,
            }],
            Progress::default(),
            Settings::default(),
            9,
        ))
    }

    fn placement(at_ms: u64, row: u32, col: u32, card: &str) -> ScriptedPlacement {
        ScriptedPlacement {
            at_ms,
            row,
            col,
            card: DefenderKind::new(card),
        }
    }

    fn config(limit_secs: u64) -> RunConfig {
        RunConfig {
            tick: Duration::from_millis(16),
            limit: Duration::from_secs(limit_secs),
        }
    }

    fn late_entry() -> WaveEntry {
        WaveEntry {
            at_sec: 600.0,
            row: 2,
            kind: AttackerKind::new("normal"),
            marker: false,
        }
    }

    #[test]
    fn empty_schedule_wins_immediately() {
        let mut simulation = simulation(Vec::new(), 50);
        let report = run(&mut simulation, &[], config(10)).expect("battle starts");

        assert_eq!(report.outcome, Some(Outcome::Win));
        assert!(report.elapsed <= Duration::from_millis(32));
        assert!(simulation.world().progress().is_completed("t-1"));
    }

    #[test]
    fn stops_at_the_limit() {
        let mut simulation = simulation(vec![late_entry()], 50);
        let report = run(&mut simulation, &[], config(2)).expect("battle starts");

        assert_eq!(report.outcome, None);
        assert!(report.elapsed >= Duration::from_secs(2));
        assert!(report.elapsed < Duration::from_millis(2_016 + 16));
    }

    #[test]
    fn unaffordable_placement_waits_for_sun() {
        let mut simulation = simulation(vec![late_entry()], 50);
        let script = [placement(0, 2, 1, "peashooter")];
        let report = run(&mut simulation, &script, config(30)).expect("battle starts");

        assert_eq!(report.planted, 1);
        assert_eq!(report.dropped, 0);
        assert!(report.collected >= 50);
        assert_eq!(simulation.snapshot().defenders.len(), 1);
    }

    #[test]
    fn invalid_placements_are_dropped_in_order() {
        let mut simulation = simulation(vec![late_entry()], 300);
        let script = [
            placement(100, 2, 1, "peashooter"),
            placement(0, 9, 9, "peashooter"),
            placement(0, 1, 1, "sunflower"),
        ];
        let report = run(&mut simulation, &script, config(1)).expect("battle starts");

        assert_eq!(report.dropped, 2);
        assert_eq!(report.planted, 1);
        assert_eq!(simulation.snapshot().sun, 200);
    }

    #[test]
    fn peashooter_clears_a_lone_attacker() {
        let entry = WaveEntry {
            at_sec: 0.0,
            ..late_entry()
        };
        let mut simulation = simulation(vec![entry], 300);
        let script = [placement(0, 2, 1, "peashooter")];
        let report = run(&mut simulation, &script, config(60)).expect("battle starts");

        assert_eq!(report.outcome, Some(Outcome::Win));
        assert_eq!(report.spawned, 1);
        assert_eq!(report.kills, 1);
    }
}
