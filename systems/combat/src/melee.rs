//! Attacker movement, bite targeting and boundary crossings.

use std::time::Duration;

use lane_defence_core::{AttackerId, DefenderId, EffectKind, Event, Outcome, RemovalCause};
use lane_defence_world::{Attacker, World};
use tracing::{debug, info};

use crate::Config;

const LOCKED_BAND_BEHIND: f32 = 4.0;
const LOCKED_BAND_AHEAD: f32 = 8.0;
const FRESH_BAND_BEHIND: f32 = 2.0;
const FRESH_BAND_AHEAD: f32 = 5.0;
const BITE_WALK_RATE: f32 = 0.016;
const WALK_RATE: f32 = 0.0105;
const BITE_EFFECT_BACK: f32 = 0.04;
const BITE_EFFECT_LIFT: f32 = 0.14;
const GUARD_LAUNCH_SLACK: f32 = 4.0;

pub(crate) fn advance(
    config: &Config,
    world: &mut World,
    dt: Duration,
    now: Duration,
    out: &mut Vec<Event>,
) {
    for id in world.attacker_ids() {
        let Some(attacker) = world.attacker(id) else {
            continue;
        };
        if !attacker.is_alive() {
            continue;
        }
        match bite_target(world, attacker) {
            Some(target) => bite(config, world, id, target, dt, now, out),
            None => walk(config, world, id, dt, out),
        }
    }
}

/// Resolves the defender an attacker bites this tick.
///
/// A locked target is kept while it exists in the same lane and the attacker
/// stays inside its widened band. Otherwise the foremost defender whose band
/// contains the attacker is chosen.
fn bite_target(world: &World, attacker: &Attacker) -> Option<DefenderId> {
    let cell_width = world.tuning().board.cell_width;

    if let Some(locked) = attacker.target.and_then(|target| world.defender(target)) {
        let half = locked.body_half_width(cell_width);
        if locked.lane() == attacker.lane
            && attacker.x >= locked.x - half - LOCKED_BAND_BEHIND
            && attacker.x <= locked.x + half + LOCKED_BAND_AHEAD
        {
            return Some(locked.id);
        }
    }

    world
        .defenders()
        .filter(|defender| defender.lane() == attacker.lane)
        .filter(|defender| {
            let half = defender.body_half_width(cell_width);
            attacker.x >= defender.x - half - FRESH_BAND_BEHIND
                && attacker.x <= defender.x + half + FRESH_BAND_AHEAD
        })
        .max_by(|left, right| left.x.total_cmp(&right.x))
        .map(|defender| defender.id)
}

fn bite(
    config: &Config,
    world: &mut World,
    id: AttackerId,
    target: DefenderId,
    dt: Duration,
    now: Duration,
    out: &mut Vec<Event>,
) {
    let rules = world.tuning().combat.clone();
    let board = world.tuning().board.clone();
    let dt_secs = dt.as_secs_f32();

    let Some(attacker) = world.attacker_mut(id) else {
        return;
    };
    attacker.target = Some(target);
    attacker.hurt = attacker.hurt.saturating_sub(dt);
    attacker.walk_phase += dt_secs * 1_000.0 * BITE_WALK_RATE;
    let (attacker_x, dps) = (attacker.x, attacker.dps);
    let show_effect = now >= attacker.next_bite_effect_at;
    if show_effect {
        attacker.next_bite_effect_at = now + rules.bite_effect_interval;
    }

    let Some(defender) = world.defender_mut(target) else {
        return;
    };
    defender.hp -= dps * dt_secs;
    defender.hurt = defender.hurt.max(rules.defender_hurt);
    let (defender_y, eaten) = (defender.y, defender.hp <= 0.0);

    if show_effect {
        world.spawn_effect(
            EffectKind::Bite,
            attacker_x - board.cell_width * BITE_EFFECT_BACK,
            defender_y - board.cell_height * BITE_EFFECT_LIFT,
            config.bite_effect,
        );
    }

    if eaten {
        let _ = world.remove_defender_with_cause(target, RemovalCause::Eaten, out);
        if let Some(attacker) = world.attacker_mut(id) {
            attacker.target = None;
        }
        debug!(
            target: "lane_defence::combat",
            attacker = id.get(),
            defender = target.get(),
            "defender eaten"
        );
    }
}

fn walk(config: &Config, world: &mut World, id: AttackerId, dt: Duration, out: &mut Vec<Event>) {
    let boundary_x = world.tuning().board.boundary_x;
    let dt_secs = dt.as_secs_f32();

    let Some(attacker) = world.attacker_mut(id) else {
        return;
    };
    attacker.target = None;
    attacker.hurt = attacker.hurt.saturating_sub(dt);
    attacker.x -= attacker.speed * dt_secs;
    attacker.walk_phase += dt_secs * 1_000.0 * WALK_RATE * (attacker.speed / 10.0);
    let (x, lane) = (attacker.x, attacker.lane);

    if x <= boundary_x && !launch_guard(config, world, lane, out) {
        info!(target: "lane_defence::combat", attacker = id.get(), lane, "lane breached");
        let _ = world.record_outcome(Outcome::Lose { lane }, out);
    }
}

/// Launches the guard of `lane`, reporting whether one was still available.
fn launch_guard(config: &Config, world: &mut World, lane: u32, out: &mut Vec<Event>) -> bool {
    let board = world.tuning().board.clone();
    let Some(guard) = world
        .guards_mut()
        .iter_mut()
        .find(|guard| guard.lane == lane)
    else {
        return false;
    };
    if !guard.active {
        return false;
    }

    guard.active = false;
    guard.moving = true;
    guard.x = guard.x.max(board.boundary_x - GUARD_LAUNCH_SLACK);
    let x = guard.x;

    world.set_status(format!("Lane {} guard triggered", lane + 1));
    let y = board.origin_y + lane as f32 * board.cell_height + board.cell_height / 2.0;
    world.spawn_effect(EffectKind::GuardLaunch, x, y, config.guard_launch_effect);
    info!(target: "lane_defence::combat", lane, "boundary guard launched");
    out.push(Event::GuardTriggered { lane });
    true
}
