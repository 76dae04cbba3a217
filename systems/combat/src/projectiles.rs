//! Projectile flight and impact.

use std::time::Duration;

use lane_defence_core::{EffectKind, Event};
use lane_defence_world::World;

use crate::Config;

const HIT_EFFECT_HEIGHT: f32 = 0.38;

pub(crate) fn advance(config: &Config, world: &mut World, dt: Duration, out: &mut Vec<Event>) {
    let (_, columns) = world.grid_dimensions();
    let board = world.tuning().board.clone();
    let rules = world.tuning().combat.clone();
    let body_offset = board.cell_width * rules.attacker_body_offset;
    let exit_x = board.far_edge(columns) + rules.projectile_exit_margin;
    let dt_secs = dt.as_secs_f32();

    for id in world.projectile_ids() {
        let Some(shot) = world.projectile_mut(id) else {
            continue;
        };
        shot.x += shot.speed * dt_secs;
        shot.ttl = shot.ttl.saturating_sub(dt);
        let (x, lane, damage, spent) = (shot.x, shot.lane, shot.damage, shot.ttl.is_zero());
        if spent {
            let _ = world.remove_projectile(id);
            continue;
        }

        let hit = world
            .attackers()
            .find(|attacker| {
                attacker.lane == lane
                    && attacker.is_alive()
                    && (attacker.x - body_offset - x).abs() < rules.projectile_hit_tolerance
            })
            .map(|attacker| (attacker.id, attacker.x));

        if let Some((target, target_x)) = hit {
            let _ = world.remove_projectile(id);
            let _ = world.damage_attacker(target, damage, out);
            if let Some(attacker) = world.attacker_mut(target) {
                attacker.hurt = rules.attacker_hurt;
            }
            let y = board.origin_y + lane as f32 * board.cell_height
                + board.cell_height * HIT_EFFECT_HEIGHT;
            world.spawn_effect(
                EffectKind::ProjectileHit,
                target_x - body_offset,
                y,
                config.hit_effect,
            );
            continue;
        }

        if x >= exit_x {
            let _ = world.remove_projectile(id);
        }
    }
}
