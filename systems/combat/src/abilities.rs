//! Defender actions: area bursts, proximity mines and ranged fire.

use std::time::Duration;

use lane_defence_core::{AbilityKind, DefenderId, EffectKind, Event, RemovalCause};
use lane_defence_world::{Defender, DefenderBehavior, World};
use tracing::debug;

use crate::Config;

const MUZZLE_AHEAD: f32 = 0.28;
const MUZZLE_LIFT: f32 = 0.19;
const MINE_EFFECT_DROP: f32 = 4.0;

pub(crate) fn resolve(config: &Config, world: &mut World, now: Duration, out: &mut Vec<Event>) {
    for id in world.defender_ids() {
        let Some(behavior) = world.defender(id).map(|defender| defender.behavior) else {
            continue;
        };
        match behavior {
            DefenderBehavior::AreaBurst { detonate_at } if now >= detonate_at => {
                detonate_area(config, world, id, out);
            }
            DefenderBehavior::ProximityMine { armed, arm_at } => {
                if !armed && now >= arm_at {
                    arm_mine(world, id, out);
                }
                trigger_mine(config, world, id, out);
            }
            DefenderBehavior::Ranged {
                projectile_speed,
                next_shot_at,
            } if now >= next_shot_at => {
                fire(config, world, id, projectile_speed, now, out);
            }
            _ => {}
        }
    }
}

fn detonate_area(config: &Config, world: &mut World, id: DefenderId, out: &mut Vec<Event>) {
    let Some(defender) = world.defender(id) else {
        return;
    };
    let (x, y, lane) = (defender.x, defender.y, defender.lane());
    let name = display_name(world, defender);
    let board = &world.tuning().board;
    let radius = board.cell_width * world.tuning().combat.area_radius_cells;
    let cell_height = board.cell_height;

    let victims: Vec<_> = world
        .attackers()
        .filter(|attacker| attacker.is_alive())
        .filter(|attacker| {
            let dx = attacker.x - x;
            let dy = (attacker.lane as f32 - lane as f32) * cell_height;
            dx.hypot(dy) <= radius
        })
        .map(|attacker| attacker.id)
        .collect();

    let mut kills = 0;
    for victim in victims {
        if world.destroy_attacker(victim, true, out) {
            kills += 1;
        }
    }

    let _ = world.remove_defender_with_cause(id, RemovalCause::Consumed, out);
    let shake = world.tuning().combat.area_shake;
    world.emit_screen_shake(shake);
    world.set_status(format!("{name} exploded"));
    world.spawn_effect(EffectKind::Explosion, x, y, config.area_explosion_effect);

    debug!(target: "lane_defence::combat", defender = id.get(), kills, "area burst detonated");
    out.push(Event::AbilityTriggered {
        defender: id,
        ability: AbilityKind::Area,
        kills,
    });
}

fn arm_mine(world: &mut World, id: DefenderId, out: &mut Vec<Event>) {
    let Some(name) = world
        .defender(id)
        .map(|defender| display_name(world, defender))
    else {
        return;
    };
    if let Some(defender) = world.defender_mut(id) {
        if let DefenderBehavior::ProximityMine { armed, .. } = &mut defender.behavior {
            *armed = true;
        }
    }
    world.set_status(format!("{name} armed"));
    debug!(target: "lane_defence::combat", defender = id.get(), "mine armed");
    out.push(Event::DefenderArmed { defender: id });
}

fn trigger_mine(config: &Config, world: &mut World, id: DefenderId, out: &mut Vec<Event>) {
    let Some(defender) = world.defender(id) else {
        return;
    };
    if !defender.is_armed() {
        return;
    }
    let (x, y, lane) = (defender.x, defender.y, defender.lane());
    let name = display_name(world, defender);
    let rules = &world.tuning().combat;
    let (ahead, behind) = (rules.mine_reach_ahead, rules.mine_reach_behind);

    let Some(victim) = world
        .attackers()
        .find(|attacker| {
            attacker.lane == lane
                && attacker.is_alive()
                && attacker.x <= x + ahead
                && attacker.x >= x - behind
        })
        .map(|attacker| attacker.id)
    else {
        return;
    };

    let kills = u32::from(world.destroy_attacker(victim, true, out));
    let _ = world.remove_defender_with_cause(id, RemovalCause::Consumed, out);
    let shake = world.tuning().combat.mine_shake;
    world.emit_screen_shake(shake);
    world.set_status(format!("{name} triggered"));
    world.spawn_effect(
        EffectKind::Explosion,
        x,
        y + MINE_EFFECT_DROP,
        config.mine_explosion_effect,
    );

    debug!(target: "lane_defence::combat", defender = id.get(), "mine triggered");
    out.push(Event::AbilityTriggered {
        defender: id,
        ability: AbilityKind::Proximity,
        kills,
    });
}

fn fire(
    config: &Config,
    world: &mut World,
    id: DefenderId,
    projectile_speed: f32,
    now: Duration,
    out: &mut Vec<Event>,
) {
    let Some(defender) = world.defender(id) else {
        return;
    };
    let (x, y, lane, damage, interval) = (
        defender.x,
        defender.y,
        defender.lane(),
        defender.attack,
        defender.action_interval(),
    );
    let board = &world.tuning().board;
    let muzzle_x = x + board.cell_width * MUZZLE_AHEAD;
    let muzzle_y = y - board.cell_height * MUZZLE_LIFT;
    let rear = x - world.tuning().combat.ranged_rear_slack;

    // Shots travel down the lane, so any live attacker ahead is a target.
    let has_target = world
        .attackers()
        .any(|attacker| attacker.lane == lane && attacker.is_alive() && attacker.x > rear);
    if !has_target {
        return;
    }

    let speed = if projectile_speed > 0.0 {
        projectile_speed
    } else {
        config.default_projectile_speed
    };
    let projectile = world
        .factory()
        .make_projectile(lane, muzzle_x, muzzle_y, damage, speed);
    let projectile = world.insert_projectile(projectile);

    if let Some(defender) = world.defender_mut(id) {
        defender.behavior = DefenderBehavior::Ranged {
            projectile_speed,
            next_shot_at: now + interval,
        };
    }
    world.spawn_effect(EffectKind::Muzzle, muzzle_x, muzzle_y, config.muzzle_effect);
    out.push(Event::ProjectileFired {
        projectile,
        defender: id,
    });
}

fn display_name(world: &World, defender: &Defender) -> String {
    world
        .defender_definition(&defender.kind)
        .map_or_else(|| defender.kind.to_string(), |definition| definition.name.clone())
}
