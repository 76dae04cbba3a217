//! Entities owned by the world.
//!
//! Cross references between entities are identifiers that must be resolved
//! through the world on every use; an entity may vanish between ticks.

use std::time::Duration;

use lane_defence_core::{
    AttackerId, AttackerKind, CellCoord, DefenderId, DefenderKind, EffectKind, ProjectileId,
    SunTokenId,
};

/// Action interval used by defenders whose type declares none.
pub const FALLBACK_ACTION_INTERVAL: Duration = Duration::from_millis(1_000);

/// Per-type behaviour of a placed defender.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefenderBehavior {
    /// Blocks attackers and does nothing else.
    Passive,
    /// Fires projectiles down its lane.
    Ranged {
        /// Projectile speed in world units per second.
        projectile_speed: f32,
        /// Earliest battle time of the next shot.
        next_shot_at: Duration,
    },
    /// Produces sun tokens at a fixed interval.
    Producer {
        /// Battle time of the next yield.
        next_yield_at: Duration,
    },
    /// Detonates once, destroying everything within reach.
    AreaBurst {
        /// Battle time of the detonation.
        detonate_at: Duration,
    },
    /// Arms after a delay, then destroys the first attacker that reaches it.
    ProximityMine {
        /// Indicates whether the mine has armed.
        armed: bool,
        /// Battle time at which the mine arms.
        arm_at: Duration,
    },
}

/// Placed, stationary defender.
#[derive(Clone, Debug, PartialEq)]
pub struct Defender {
    /// Identifier allocated by the world.
    pub id: DefenderId,
    /// Type of the defender.
    pub kind: DefenderKind,
    /// Cell occupied by the defender.
    pub cell: CellCoord,
    /// Horizontal centre in world units.
    pub x: f32,
    /// Vertical centre in world units.
    pub y: f32,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at placement.
    pub max_hp: f32,
    /// Damage per projectile.
    pub attack: f32,
    /// Interval between shots or yields.
    pub interval: Duration,
    /// Type-specific behaviour and timers.
    pub behavior: DefenderBehavior,
    /// Decorative sway phase in radians.
    pub sway_phase: f32,
    /// Remaining hurt flash.
    pub hurt: Duration,
}

impl Defender {
    /// Lane the defender sits in.
    #[must_use]
    pub const fn lane(&self) -> u32 {
        self.cell.row()
    }

    /// Half of the body width, which sizes the band attackers bite from.
    #[must_use]
    pub fn body_half_width(&self, cell_width: f32) -> f32 {
        let fraction = match self.behavior {
            DefenderBehavior::Passive => 0.39,
            DefenderBehavior::AreaBurst { .. } => 0.5,
            DefenderBehavior::ProximityMine { .. } => 0.42,
            DefenderBehavior::Ranged { .. } | DefenderBehavior::Producer { .. } => 0.34,
        };
        cell_width * fraction
    }

    /// Interval between shots or yields; a zero interval acts once per second.
    #[must_use]
    pub fn action_interval(&self) -> Duration {
        if self.interval.is_zero() {
            FALLBACK_ACTION_INTERVAL
        } else {
            self.interval
        }
    }

    /// Reports whether the defender is ready to act; unarmed mines are not.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        !matches!(
            self.behavior,
            DefenderBehavior::ProximityMine { armed: false, .. }
        )
    }
}

/// Mobile hostile unit walking toward the boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Attacker {
    /// Identifier allocated by the world.
    pub id: AttackerId,
    /// Type of the attacker.
    pub kind: AttackerKind,
    /// Lane the attacker walks along.
    pub lane: u32,
    /// Horizontal position in world units.
    pub x: f32,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Damage per second dealt while biting.
    pub dps: f32,
    /// Resource credited when destroyed by damage.
    pub reward: u32,
    /// Defender currently locked as the bite target.
    pub target: Option<DefenderId>,
    /// Decorative walk phase in radians.
    pub walk_phase: f32,
    /// Remaining hurt flash.
    pub hurt: Duration,
    /// Earliest battle time of the next bite effect.
    pub next_bite_effect_at: Duration,
}

impl Attacker {
    /// Reports whether the attacker still has hit points.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

/// Ranged attack in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    /// Identifier allocated by the world.
    pub id: ProjectileId,
    /// Lane the projectile travels along.
    pub lane: u32,
    /// Horizontal position in world units.
    pub x: f32,
    /// Vertical position in world units.
    pub y: f32,
    /// Damage applied on impact.
    pub damage: f32,
    /// Speed in world units per second.
    pub speed: f32,
    /// Remaining time to live.
    pub ttl: Duration,
}

/// Collectible unit of the resource economy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunToken {
    /// Identifier allocated by the world.
    pub id: SunTokenId,
    /// Horizontal position in world units.
    pub x: f32,
    /// Vertical position in world units.
    pub y: f32,
    /// Resource value.
    pub value: u32,
    /// Indicates whether the token is still falling.
    pub falling: bool,
    /// Height at which a falling token comes to rest.
    pub fall_to_y: f32,
    /// Battle time the token appeared.
    pub created_at: Duration,
    /// Battle time after which the token is discarded.
    pub expires_at: Duration,
    /// Battle time at which the token collects itself.
    pub auto_collect_at: Duration,
    /// Decorative drift phase in radians.
    pub drift_phase: f32,
}

/// Last-resort defence of a single lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryGuard {
    /// Lane protected by the guard.
    pub lane: u32,
    /// Horizontal position in world units.
    pub x: f32,
    /// Indicates whether the guard can still be triggered.
    pub active: bool,
    /// Indicates whether the guard is sweeping its lane.
    pub moving: bool,
}

/// Ephemeral decoration tracked only for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualEffect {
    /// Kind of effect.
    pub kind: EffectKind,
    /// Horizontal position in world units.
    pub x: f32,
    /// Vertical position in world units.
    pub y: f32,
    /// Remaining lifetime.
    pub ttl: Duration,
    /// Lifetime at creation.
    pub max_ttl: Duration,
}

impl VisualEffect {
    /// Elapsed share of the lifetime, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.max_ttl.is_zero() {
            return 1.0;
        }
        let remaining = self.ttl.as_secs_f32() / self.max_ttl.as_secs_f32();
        (1.0 - remaining).clamp(0.0, 1.0)
    }
}

/// Cursor into the static wave schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveState {
    /// Index of the next schedule entry.
    pub cursor: usize,
    /// Indicates whether the battle clock has been started.
    pub started: bool,
    /// Battle time the schedule offsets are measured from.
    pub started_at: Duration,
    /// Earliest battle time of the next dispatch.
    pub gate: Duration,
}
