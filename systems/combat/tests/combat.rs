use std::time::Duration;

use lane_defence_core::{
    AbilityKind, AttackerDefinition, AttackerId, AttackerKind, CellCoord, DefenderDefinition,
    DefenderId, DefenderKind, Event, LevelConfig, Outcome, Progress, RemovalCause, SceneMode,
    SceneTrigger, Settings,
};
use lane_defence_system_combat::Combat;
use lane_defence_world::{transition, World};

const TICK: Duration = Duration::from_millis(16);

fn defender(
    id: &str,
    name: &str,
    hp: f32,
    ability: AbilityKind,
    projectile_speed: Option<f32>,
    ability_ms: Option<u64>,
) -> DefenderDefinition {
    DefenderDefinition {
        id: DefenderKind::new(id),
        name: String::from(name),
        cost: 0,
        cooldown_ms: 0,
        hp,
        attack: 20.0,
        interval_ms: 1_400,
        projectile_speed,
        ability,
        ability_ms,
    }
}

fn active_world() -> World {
    let mut world = World::new(
        LevelConfig {
            id: String::from("1-1"),
            rows: 5,
            columns: 9,
            initial_sun: 100,
            waves: 0,
            spawn_table: Vec::new(),
        },
        vec![
            defender("peashooter", "Peashooter", 300.0, AbilityKind::None, Some(260.0), None),
            defender("wallnut", "Wall-nut", 4_000.0, AbilityKind::None, None, None),
            defender("cherrybomb", "Cherry Bomb", 300.0, AbilityKind::Area, None, None),
            defender(
                "potatomine",
                "Potato Mine",
                300.0,
                AbilityKind::Proximity,
                None,
                Some(1_000),
            ),
        ],
        vec![AttackerDefinition {
            id: AttackerKind::new("normal"),
            hp: 40.0,
            speed: 0.0,
            dps: 36.0,
            reward: 10,
        }],
        Progress::default(),
        Settings::default(),
        9,
    );
    let mut events = Vec::new();
    let _ = transition(&mut world, SceneTrigger::OpenLevelSelect, &mut events)
        .expect("level select opens");
    let _ = transition(&mut world, SceneTrigger::StartBattle, &mut events)
        .expect("battle starts");
    world
}

fn plant(world: &mut World, kind: &str, row: u32, column: u32, now: Duration) -> DefenderId {
    let definition = world
        .defender_definition(&DefenderKind::new(kind))
        .cloned()
        .expect("known defender");
    let defender = world
        .factory()
        .make_defender(&definition, CellCoord::new(row, column), now);
    world.insert_defender(defender).expect("free cell")
}

fn spawn(world: &mut World, lane: u32, x: f32, hp: f32, speed: f32) -> AttackerId {
    let definition = world
        .attacker_definition(&AttackerKind::new("normal"))
        .cloned()
        .expect("known attacker");
    let mut attacker = world.factory().make_attacker(&definition, lane);
    attacker.x = x;
    attacker.hp = hp;
    attacker.max_hp = hp;
    attacker.speed = speed;
    world.insert_attacker(attacker)
}

fn kills_of(events: &[Event], id: AttackerId) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AttackerKilled { attacker, reward } if *attacker == id => Some(*reward),
            _ => None,
        })
        .collect()
}

#[test]
fn ranged_defender_kills_stationary_attacker() {
    let mut world = active_world();
    let _ = plant(&mut world, "peashooter", 0, 0, Duration::ZERO);
    let target = spawn(&mut world, 0, 400.0, 40.0, 0.0);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    let mut now = Duration::ZERO;
    while now < Duration::from_secs(8) && world.attacker(target).is_some() {
        now += TICK;
        combat.handle(&mut world, TICK, now, &mut events);
    }

    assert!(world.attacker(target).is_none(), "attacker destroyed within 8 s");
    assert_eq!(kills_of(&events, target), vec![10]);
    assert_eq!(world.sun(), 110);
    let shots = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { .. }))
        .count();
    assert_eq!(shots, 2);
    assert_eq!(world.outcome(), Some(Outcome::Win));
}

#[test]
fn ranged_defender_holds_fire_without_target() {
    let mut world = active_world();
    let _ = plant(&mut world, "peashooter", 0, 4, Duration::ZERO);
    let _behind = spawn(&mut world, 0, 300.0, 40.0, 0.0);
    let _other_lane = spawn(&mut world, 1, 900.0, 40.0, 0.0);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    combat.handle(&mut world, TICK, Duration::from_secs(2), &mut events);
    assert_eq!(world.projectiles().count(), 0);
}

#[test]
fn spent_guard_lets_attacker_breach_lane() {
    let mut world = active_world();
    world.guards_mut()[0].active = false;
    let _ = spawn(&mut world, 0, 210.0, 40.0, 18.0);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    combat.handle(
        &mut world,
        Duration::from_millis(200),
        Duration::from_millis(200),
        &mut events,
    );

    assert_eq!(world.outcome(), Some(Outcome::Lose { lane: 0 }));
    assert_eq!(world.scene_mode(), SceneMode::Terminal);
    assert!(events.contains(&Event::OutcomeReached {
        outcome: Outcome::Lose { lane: 0 },
    }));

    assert!(!world.record_outcome(Outcome::Win, &mut events));
    combat.handle(&mut world, TICK, Duration::from_millis(216), &mut events);
    assert_eq!(world.outcome(), Some(Outcome::Lose { lane: 0 }));
    assert_eq!(world.take_new_outcome(), Some(Outcome::Lose { lane: 0 }));
    assert_eq!(world.take_new_outcome(), None);
}

#[test]
fn active_guard_sweeps_lane_without_reward() {
    let mut world = active_world();
    let crossing = spawn(&mut world, 0, 210.0, 40.0, 18.0);
    let _far = spawn(&mut world, 4, 1_100.0, 40.0, 0.0);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    let dt = Duration::from_millis(200);
    combat.handle(&mut world, dt, dt, &mut events);

    assert!(events.contains(&Event::GuardTriggered { lane: 0 }));
    assert_eq!(kills_of(&events, crossing), vec![0]);
    assert_eq!(world.sun(), 100);
    assert_eq!(world.outcome(), None);
    let guard = world.guards()[0];
    assert!(!guard.active);
    assert!(guard.moving);

    let mut now = dt;
    for _ in 0..20 {
        now += dt;
        combat.handle(&mut world, dt, now, &mut events);
    }
    let guard = world.guards()[0];
    assert!(!guard.moving, "guard stops past the far edge");
    assert!(!guard.active, "guard is spent for the rest of the battle");
}

#[test]
fn proximity_mine_arms_then_destroys_first_attacker() {
    let mut world = active_world();
    let mine = plant(&mut world, "potatomine", 0, 3, Duration::ZERO);
    let victim = spawn(&mut world, 0, 560.0, 400.0, 0.0);
    let _bystander = spawn(&mut world, 4, 1_100.0, 400.0, 0.0);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    combat.handle(&mut world, TICK, Duration::from_millis(500), &mut events);
    assert!(world.defender(mine).is_some());
    assert!(!world.defender(mine).map_or(true, |d| d.is_armed()));

    events.clear();
    combat.handle(&mut world, TICK, Duration::from_millis(1_000), &mut events);
    assert!(events.contains(&Event::DefenderArmed { defender: mine }));
    assert!(events.contains(&Event::AbilityTriggered {
        defender: mine,
        ability: AbilityKind::Proximity,
        kills: 1,
    }));
    assert!(events.contains(&Event::DefenderRemoved {
        defender: mine,
        cell: CellCoord::new(0, 3),
        cause: RemovalCause::Consumed,
    }));
    assert!(world.defender(mine).is_none());
    assert!(world.attacker(victim).is_none());
    assert_eq!(world.sun(), 110);
    assert!(world.screen_shake() > Duration::ZERO);
    assert_eq!(world.status(), "Potato Mine triggered");
}

#[test]
fn area_burst_destroys_attackers_within_radius() {
    let mut world = active_world();
    let bomb = plant(&mut world, "cherrybomb", 2, 4, Duration::ZERO);
    let same_lane = spawn(&mut world, 2, 700.0, 400.0, 0.0);
    let adjacent_lane = spawn(&mut world, 1, 640.0, 400.0, 0.0);
    let out_of_reach = spawn(&mut world, 0, 640.0, 400.0, 0.0);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    combat.handle(&mut world, TICK, Duration::from_millis(449), &mut events);
    assert!(world.defender(bomb).is_some(), "fuse still burning");

    combat.handle(&mut world, TICK, Duration::from_millis(450), &mut events);
    assert!(world.defender(bomb).is_none());
    assert!(world.attacker(same_lane).is_none());
    assert!(world.attacker(adjacent_lane).is_none());
    assert!(world.attacker(out_of_reach).is_some());
    assert!(events.contains(&Event::AbilityTriggered {
        defender: bomb,
        ability: AbilityKind::Area,
        kills: 2,
    }));
    assert_eq!(world.sun(), 120);
    assert_eq!(world.status(), "Cherry Bomb exploded");
}

#[test]
fn reward_is_credited_once_when_burst_and_projectile_overlap() {
    let mut world = active_world();
    let _ = plant(&mut world, "cherrybomb", 2, 4, Duration::ZERO);
    let victim = spawn(&mut world, 2, 700.0, 20.0, 0.0);
    let shot = world
        .factory()
        .make_projectile(2, 700.0 - 84.0 * 0.16, 300.0, 20.0, 0.0);
    let _ = world.insert_projectile(shot);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    combat.handle(&mut world, TICK, Duration::from_millis(450), &mut events);

    assert_eq!(kills_of(&events, victim), vec![10]);
    assert_eq!(world.sun(), 110);
    assert_eq!(world.projectiles().count(), 1, "shot ignores destroyed attackers");
}

#[test]
fn locked_bite_target_is_kept_inside_widened_band() {
    let mut world = active_world();
    let wall = plant(&mut world, "wallnut", 0, 3, Duration::ZERO);
    let locked = spawn(&mut world, 0, 577.0, 400.0, 18.0);
    let fresh = spawn(&mut world, 0, 577.0, 400.0, 18.0);
    if let Some(attacker) = world.attacker_mut(locked) {
        attacker.target = Some(wall);
    }
    let mut combat = Combat::default();
    let mut events = Vec::new();

    combat.handle(&mut world, TICK, TICK, &mut events);

    let locked = world.attacker(locked).expect("locked attacker alive");
    assert_eq!(locked.target, Some(wall));
    assert!((locked.x - 577.0).abs() < f32::EPSILON, "biting attackers stand still");

    let fresh = world.attacker(fresh).expect("fresh attacker alive");
    assert_eq!(fresh.target, None);
    assert!(fresh.x < 577.0, "attackers outside the fresh band keep walking");

    let wall = world.defender(wall).expect("wall still standing");
    assert!(wall.hp < wall.max_hp);
}

#[test]
fn eaten_defender_is_removed_and_target_cleared() {
    let mut world = active_world();
    let wall = plant(&mut world, "peashooter", 1, 2, Duration::ZERO);
    let biter = spawn(&mut world, 1, 454.0, 400.0, 18.0);
    if let Some(attacker) = world.attacker_mut(biter) {
        attacker.dps = 100_000.0;
    }
    let mut combat = Combat::default();
    let mut events = Vec::new();

    combat.handle(&mut world, TICK, TICK, &mut events);

    assert!(world.defender(wall).is_none());
    assert!(world.find_defender_at(CellCoord::new(1, 2)).is_none());
    assert_eq!(world.attacker(biter).and_then(|a| a.target), None);
    assert!(events.contains(&Event::DefenderRemoved {
        defender: wall,
        cell: CellCoord::new(1, 2),
        cause: RemovalCause::Eaten,
    }));
}

#[test]
fn exhausted_schedule_with_no_attackers_wins() {
    let mut world = active_world();
    let mut combat = Combat::default();
    let mut events = Vec::new();

    combat.handle(&mut world, TICK, TICK, &mut events);

    assert_eq!(world.outcome(), Some(Outcome::Win));
    assert!(world.progress().is_completed("1-1"));
    assert_eq!(world.scene_mode(), SceneMode::Terminal);
}

#[test]
fn suspended_battle_freezes_combat() {
    let mut world = active_world();
    let target = spawn(&mut world, 0, 600.0, 40.0, 18.0);
    let mut events = Vec::new();
    let _ = transition(&mut world, SceneTrigger::TogglePause, &mut events).expect("pause");
    let mut combat = Combat::default();
    events.clear();

    combat.handle(&mut world, Duration::from_secs(5), Duration::from_secs(5), &mut events);

    assert!(events.is_empty());
    let attacker = world.attacker(target).expect("attacker untouched");
    assert!((attacker.x - 600.0).abs() < f32::EPSILON);
    assert_eq!(world.outcome(), None);
}

#[test]
fn guard_sweeps_everything_it_passes_in_one_long_tick() {
    let mut world = active_world();
    {
        let guard = &mut world.guards_mut()[0];
        guard.active = false;
        guard.moving = true;
    }
    let passed_over = spawn(&mut world, 0, 500.0, 400.0, 0.0);
    let beyond = spawn(&mut world, 0, 900.0, 400.0, 0.0);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    let dt = Duration::from_secs(1);
    combat.handle(&mut world, dt, dt, &mut events);

    assert!((world.guards()[0].x - 662.0).abs() < 1e-3);
    assert!(world.attacker(passed_over).is_none(), "attacker behind the guard's new position");
    assert_eq!(kills_of(&events, passed_over), vec![0]);
    assert!(world.attacker(beyond).is_some());
    assert_eq!(world.outcome(), None);
}

#[test]
fn ranged_defender_kill_time_is_bounded_by_shots_needed() {
    let mut world = active_world();
    let shooter = plant(&mut world, "peashooter", 0, 0, Duration::ZERO);
    let (shooter_x, interval) = {
        let shooter = world.defender(shooter).expect("planted");
        (shooter.x, shooter.action_interval())
    };
    let start_x = 900.0;
    let walker = spawn(&mut world, 0, start_x, 270.0, 18.0);
    let mut combat = Combat::default();
    let mut events = Vec::new();

    let shots_needed = (270.0_f32 / 20.0).ceil() as u32;
    let travel = Duration::from_secs_f32((start_x - shooter_x) / 260.0);
    let bound = interval * shots_needed + travel + TICK * 2;

    let mut now = Duration::ZERO;
    while now <= bound && world.attacker(walker).is_some() {
        now += TICK;
        combat.handle(&mut world, TICK, now, &mut events);
    }

    assert!(world.attacker(walker).is_none(), "walker outlived {bound:?}");
    assert!(now > interval * (shots_needed - 1), "no kill before the last needed shot");
    assert_eq!(kills_of(&events, walker), vec![10]);
    assert!(world.defender(shooter).is_some(), "walker never reached the shooter");
}
