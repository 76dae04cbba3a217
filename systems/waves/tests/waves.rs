use std::time::Duration;

use lane_defence_core::{
    AttackerDefinition, AttackerKind, Event, LevelConfig, Progress, SceneTrigger, Settings,
    WaveEntry,
};
use lane_defence_system_waves::{Config, WaveSpawner};
use lane_defence_world::{transition, World};

fn entry(at_sec: f32, row: u32, kind: &str, marker: bool) -> WaveEntry {
    WaveEntry {
        at_sec,
        row,
        kind: AttackerKind::new(kind),
        marker,
    }
}

fn world_with_schedule(spawn_table: Vec<WaveEntry>) -> World {
    World::new(
        LevelConfig {
            id: String::from("1-1"),
            rows: 5,
            columns: 9,
            initial_sun: 50,
            waves: 1,
            spawn_table,
        },
        Vec::new(),
        vec![AttackerDefinition {
            id: AttackerKind::new("normal"),
            hp: 270.0,
            speed: 18.0,
            dps: 36.0,
            reward: 0,
        }],
        Progress::default(),
        Settings::default(),
        3,
    )
}

fn start(world: &mut World) {
    let mut events = Vec::new();
    let _ = transition(world, SceneTrigger::OpenLevelSelect, &mut events)
        .expect("level select opens");
    let _ = transition(world, SceneTrigger::StartBattle, &mut events).expect("battle starts");
}

#[test]
fn due_entry_is_dispatched_exactly_once() {
    let mut world = world_with_schedule(vec![entry(0.0, 0, "normal", false)]);
    start(&mut world);
    let mut spawner = WaveSpawner::default();
    let mut events = Vec::new();

    spawner.handle(&mut world, Duration::from_millis(1_000), &mut events);
    assert_eq!(world.attackers().count(), 1);
    assert_eq!(world.waves().cursor, 1);
    assert_eq!(world.status(), "Attackers approaching");
    assert!(matches!(
        events.as_slice(),
        [Event::AttackerSpawned { lane: 0, marker: false, .. }]
    ));

    spawner.handle(&mut world, Duration::from_millis(5_000), &mut events);
    assert_eq!(world.attackers().count(), 1, "schedule is never re-dispatched");
    assert_eq!(events.len(), 1);
}

#[test]
fn entries_wait_for_their_offset() {
    let mut world = world_with_schedule(vec![entry(2.5, 1, "normal", true)]);
    start(&mut world);
    let mut spawner = WaveSpawner::default();
    let mut events = Vec::new();

    spawner.handle(&mut world, Duration::from_millis(2_499), &mut events);
    assert!(events.is_empty());

    spawner.handle(&mut world, Duration::from_millis(2_500), &mut events);
    assert_eq!(world.waves().cursor, 1);
    assert_eq!(world.status(), "Flag wave incoming");
}

#[test]
fn backlog_is_gated_one_dispatch_per_spacing() {
    let mut world = world_with_schedule(vec![
        entry(0.0, 0, "normal", false),
        entry(0.0, 1, "normal", false),
        entry(0.0, 2, "normal", false),
    ]);
    start(&mut world);
    let mut spawner = WaveSpawner::new(Config::new(Duration::from_millis(520)));
    let mut events = Vec::new();

    spawner.handle(&mut world, Duration::from_secs(10), &mut events);
    spawner.handle(&mut world, Duration::from_millis(10_100), &mut events);
    assert_eq!(world.attackers().count(), 1);

    spawner.handle(&mut world, Duration::from_millis(10_520), &mut events);
    assert_eq!(world.attackers().count(), 2);
    assert_eq!(world.waves().gate, Duration::from_millis(11_040));
}

#[test]
fn unknown_attacker_type_is_skipped_but_consumes_entry() {
    let mut world = world_with_schedule(vec![
        entry(0.0, 0, "gargantuar", false),
        entry(0.0, 0, "normal", false),
    ]);
    start(&mut world);
    let mut spawner = WaveSpawner::default();
    let mut events = Vec::new();

    spawner.handle(&mut world, Duration::ZERO, &mut events);
    assert_eq!(world.attackers().count(), 0);
    assert_eq!(world.waves().cursor, 1);
    assert_eq!(
        events,
        vec![Event::WaveEntrySkipped {
            index: 0,
            kind: AttackerKind::new("gargantuar"),
        }]
    );

    spawner.handle(&mut world, Duration::from_millis(520), &mut events);
    assert_eq!(world.attackers().count(), 1);
}

#[test]
fn out_of_range_lane_is_clamped() {
    let mut world = world_with_schedule(vec![entry(0.0, 42, "normal", false)]);
    start(&mut world);
    let mut spawner = WaveSpawner::default();
    let mut events = Vec::new();

    spawner.handle(&mut world, Duration::ZERO, &mut events);
    let attacker = world.attackers().next().expect("attacker spawned");
    assert_eq!(attacker.lane, 4);
}

#[test]
fn spawner_is_idle_outside_active_battle() {
    let mut world = world_with_schedule(vec![entry(0.0, 0, "normal", false)]);
    let mut spawner = WaveSpawner::default();
    let mut events = Vec::new();

    spawner.handle(&mut world, Duration::from_secs(3), &mut events);
    assert!(events.is_empty());

    start(&mut world);
    let _ = transition(&mut world, SceneTrigger::TogglePause, &mut events).expect("pause");
    events.clear();
    spawner.handle(&mut world, Duration::from_secs(3), &mut events);
    assert!(events.is_empty());
    assert_eq!(world.waves().cursor, 0);
}
