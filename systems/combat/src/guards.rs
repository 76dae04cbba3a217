//! Boundary guard sweeps.

use std::time::Duration;

use lane_defence_core::Event;
use lane_defence_world::World;
use tracing::debug;

pub(crate) fn sweep(world: &mut World, dt: Duration, out: &mut Vec<Event>) {
    let (_, columns) = world.grid_dimensions();
    let board = world.tuning().board.clone();
    let exit_x = board.far_edge(columns) + board.guard_exit_margin;
    let dt_secs = dt.as_secs_f32();

    for index in 0..world.guards().len() {
        let Some(guard) = world.guards_mut().get_mut(index) else {
            continue;
        };
        if !guard.moving {
            continue;
        }
        let from_x = guard.x;
        guard.x += board.guard_speed * dt_secs;
        let (x, lane) = (guard.x, guard.lane);

        // Reach spans the whole distance travelled this tick.
        let victims: Vec<_> = world
            .attackers()
            .filter(|attacker| {
                attacker.lane == lane
                    && attacker.is_alive()
                    && attacker.x < x + board.guard_reach_ahead
                    && attacker.x > from_x - board.guard_reach_behind
            })
            .map(|attacker| attacker.id)
            .collect();
        for victim in victims {
            if world.destroy_attacker(victim, false, out) {
                debug!(target: "lane_defence::combat", attacker = victim.get(), lane, "swept by guard");
            }
        }

        if x > exit_x {
            if let Some(guard) = world.guards_mut().get_mut(index) {
                guard.moving = false;
            }
        }
    }
}
