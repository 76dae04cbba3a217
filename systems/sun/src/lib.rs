#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sun economy system: ambient drops, producer yields, token motion,
//! collection and expiry.

use std::time::Duration;

use lane_defence_core::{Event, SunSource, SunTokenId};
use lane_defence_world::{DefenderBehavior, SunTokenParams, World};
use tracing::debug;

const PRODUCER_SCATTER: f32 = 16.0;
const PRODUCER_LIFT: f32 = 0.58;
const AMBIENT_MARGIN_X: f32 = 20.0;
const AMBIENT_SPAWN_ABOVE: f32 = 24.0;
const AMBIENT_REST_TOP: f32 = 16.0;
const AMBIENT_REST_BOTTOM: f32 = 10.0;

/// Per-tick sun economy system.
#[derive(Debug, Default)]
pub struct SunEconomy;

impl SunEconomy {
    /// Creates a new sun economy system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs one tick of the economy.
    ///
    /// The phases run in a fixed order: ambient drops, drift and fall,
    /// auto-collection, producer yields, expiry.
    pub fn handle(&mut self, world: &mut World, dt: Duration, now: Duration, out: &mut Vec<Event>) {
        if !world.is_battle_active() {
            return;
        }

        spawn_ambient(world, dt, now, out);
        move_tokens(world, dt);
        auto_collect(world, now, out);
        yield_from_producers(world, now, out);
        expire_tokens(world, now, out);
    }
}

/// Collects the token nearest to `(x, y)` within the pickup radius.
///
/// Returns the collected token, or `None` when nothing is in reach or the
/// battle is not active.
pub fn collect_at(world: &mut World, x: f32, y: f32, out: &mut Vec<Event>) -> Option<SunTokenId> {
    if !world.is_battle_active() {
        return None;
    }
    let radius = world.tuning().sun.pickup_radius;
    let nearest = world
        .sun_tokens()
        .map(|token| (token.id, (token.x - x).hypot(token.y - y)))
        .filter(|(_, distance)| *distance < radius)
        .min_by(|left, right| left.1.total_cmp(&right.1))
        .map(|(id, _)| id)?;

    if collect(world, nearest, false, out) {
        Some(nearest)
    } else {
        None
    }
}

/// Collects the token with the provided identifier, crediting its value.
///
/// Returns whether the token existed.
pub fn collect_by_id(world: &mut World, id: SunTokenId, out: &mut Vec<Event>) -> bool {
    collect(world, id, false, out)
}

fn collect(world: &mut World, id: SunTokenId, automatic: bool, out: &mut Vec<Event>) -> bool {
    let Some(token) = world.remove_sun_token(id) else {
        return false;
    };
    let pool = world.credit_sun(token.value);
    debug!(
        target: "lane_defence::sun",
        token = id.get(),
        value = token.value,
        automatic,
        pool,
        "sun collected"
    );
    out.push(Event::SunCollected {
        token: id,
        value: token.value,
        automatic,
    });
    true
}

fn spawn_ambient(world: &mut World, dt: Duration, now: Duration, out: &mut Vec<Event>) {
    let interval = world.tuning().sun.ambient_interval;
    if interval.is_zero() {
        return;
    }

    let mut elapsed = dt;
    let mut countdown = world.ambient_countdown();
    while elapsed >= countdown {
        elapsed -= countdown;
        countdown = interval;
        spawn_ambient_token(world, now, out);
    }
    world.set_ambient_countdown(countdown - elapsed);
}

fn spawn_ambient_token(world: &mut World, now: Duration, out: &mut Vec<Event>) {
    let (rows, columns) = world.grid_dimensions();
    let board = world.tuning().board.clone();
    let rules = world.tuning().sun.clone();

    let playable_width = columns as f32 * board.cell_width - 2.0 * AMBIENT_MARGIN_X;
    let playable_height =
        rows as f32 * board.cell_height - AMBIENT_REST_TOP - AMBIENT_REST_BOTTOM;
    let x = board.origin_x + AMBIENT_MARGIN_X + world.random_unit() * playable_width;
    let fall_to_y = board.origin_y + AMBIENT_REST_TOP + world.random_unit() * playable_height;

    let token = world.factory().make_sun_token(SunTokenParams {
        x,
        y: board.origin_y - AMBIENT_SPAWN_ABOVE,
        value: rules.ambient_value,
        fall_to_y: Some(fall_to_y),
        created_at: now,
        expires_at: now + rules.token_lifetime + rules.ambient_extra_lifetime,
        auto_collect_at: Some(now + rules.ambient_auto_collect),
    });
    let id = world.insert_sun_token(token);
    debug!(target: "lane_defence::sun", token = id.get(), x, "ambient sun dropped");
    out.push(Event::SunSpawned {
        token: id,
        source: SunSource::Ambient,
        value: rules.ambient_value,
    });
}

fn move_tokens(world: &mut World, dt: Duration) {
    let rules = world.tuning().sun.clone();
    let dt_ms = dt.as_secs_f32() * 1_000.0;
    let dt_secs = dt.as_secs_f32();
    for token in world.sun_tokens_mut() {
        token.drift_phase += dt_ms * rules.drift_rate;
        token.x += token.drift_phase.sin() * rules.drift_amplitude;
        if token.falling {
            token.y += rules.fall_speed * dt_secs;
            if token.y >= token.fall_to_y {
                token.y = token.fall_to_y;
                token.falling = false;
            }
        }
    }
}

fn auto_collect(world: &mut World, now: Duration, out: &mut Vec<Event>) {
    let due: Vec<SunTokenId> = world
        .sun_tokens()
        .filter(|token| now >= token.auto_collect_at)
        .map(|token| token.id)
        .collect();
    for id in due {
        let _ = collect(world, id, true, out);
    }
}

fn yield_from_producers(world: &mut World, now: Duration, out: &mut Vec<Event>) {
    let board = world.tuning().board.clone();
    let rules = world.tuning().sun.clone();

    for defender_id in world.defender_ids() {
        let Some(defender) = world.defender(defender_id) else {
            continue;
        };
        let DefenderBehavior::Producer { next_yield_at } = defender.behavior else {
            continue;
        };
        if now < next_yield_at {
            continue;
        }
        let (x, y, interval) = (defender.x, defender.y, defender.action_interval());

        let scatter = (world.random_unit() - 0.5) * PRODUCER_SCATTER;
        let token = world.factory().make_sun_token(SunTokenParams {
            x: x + scatter,
            y: y - board.cell_height * PRODUCER_LIFT,
            value: rules.producer_value,
            fall_to_y: None,
            created_at: now,
            expires_at: now + rules.token_lifetime,
            auto_collect_at: Some(now + rules.producer_auto_collect),
        });
        let token_id = world.insert_sun_token(token);

        if let Some(defender) = world.defender_mut(defender_id) {
            defender.behavior = DefenderBehavior::Producer {
                next_yield_at: now + interval,
            };
        }
        debug!(
            target: "lane_defence::sun",
            token = token_id.get(),
            defender = defender_id.get(),
            "producer yielded sun"
        );
        out.push(Event::SunSpawned {
            token: token_id,
            source: SunSource::Producer(defender_id),
            value: rules.producer_value,
        });
    }
}

fn expire_tokens(world: &mut World, now: Duration, out: &mut Vec<Event>) {
    let expired: Vec<SunTokenId> = world
        .sun_tokens()
        .filter(|token| token.expires_at < now)
        .map(|token| token.id)
        .collect();
    for id in expired {
        if world.remove_sun_token(id).is_some() {
            out.push(Event::SunExpired { token: id });
        }
    }
}
