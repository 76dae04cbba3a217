//! Read-only snapshots handed to presentation every tick.

use std::time::Duration;

use crate::{
    AttackerId, AttackerKind, CellCoord, DefenderId, DefenderKind, EffectKind, Outcome,
    ProjectileId, SceneMode, SunTokenId,
};

/// Immutable representation of a defender used for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct DefenderSnapshot {
    /// Identifier allocated to the defender.
    pub id: DefenderId,
    /// Type of the defender.
    pub kind: DefenderKind,
    /// Cell occupied by the defender.
    pub cell: CellCoord,
    /// Horizontal centre in world units.
    pub x: f32,
    /// Vertical centre in world units.
    pub y: f32,
    /// Remaining hit points relative to the maximum, in `[0, 1]`.
    pub hp_ratio: f32,
    /// Indicates whether a delayed-arm defender is armed; always true for other types.
    pub armed: bool,
    /// Indicates whether the defender is currently being hurt.
    pub hurt: bool,
    /// Decorative sway phase in radians.
    pub sway_phase: f32,
}

/// Immutable representation of an attacker used for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackerSnapshot {
    /// Identifier allocated to the attacker.
    pub id: AttackerId,
    /// Type of the attacker.
    pub kind: AttackerKind,
    /// Lane the attacker walks along.
    pub lane: u32,
    /// Horizontal position in world units.
    pub x: f32,
    /// Remaining hit points relative to the maximum, in `[0, 1]`.
    pub hp_ratio: f32,
    /// Defender currently being bitten, if any.
    pub biting: Option<DefenderId>,
    /// Indicates whether the attacker was struck recently.
    pub hurt: bool,
    /// Decorative walk phase in radians.
    pub walk_phase: f32,
}

/// Immutable representation of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Lane the projectile travels along.
    pub lane: u32,
    /// Horizontal position in world units.
    pub x: f32,
    /// Vertical position in world units.
    pub y: f32,
}

/// Immutable representation of a collectible sun token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunTokenSnapshot {
    /// Identifier allocated to the token.
    pub id: SunTokenId,
    /// Horizontal position in world units.
    pub x: f32,
    /// Vertical position in world units.
    pub y: f32,
    /// Resource value of the token.
    pub value: u32,
    /// Indicates whether the token is still falling.
    pub falling: bool,
}

/// Immutable representation of a decorative effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// Kind of effect.
    pub kind: EffectKind,
    /// Horizontal position in world units.
    pub x: f32,
    /// Vertical position in world units.
    pub y: f32,
    /// Elapsed share of the effect's lifetime, in `[0, 1]`.
    pub progress: f32,
}

/// Immutable representation of a lane's boundary guard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuardSnapshot {
    /// Lane protected by the guard.
    pub lane: u32,
    /// Horizontal position in world units.
    pub x: f32,
    /// Indicates whether the guard can still be triggered.
    pub active: bool,
    /// Indicates whether the guard is sweeping its lane.
    pub moving: bool,
}

/// Remaining card cooldown for a defender type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CooldownSnapshot {
    /// Defender type printed on the card.
    pub kind: DefenderKind,
    /// Time left before the card can be used again.
    pub remaining: Duration,
}

/// Progress through the wave schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveProgress {
    /// Number of schedule entries already processed.
    pub cursor: usize,
    /// Number of entries in the schedule.
    pub total: usize,
    /// Number of waves advertised by the level.
    pub advertised: u32,
}

impl WaveProgress {
    /// Reports whether every schedule entry has been processed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.cursor >= self.total
    }
}

/// Complete read-only view of the world for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSnapshot {
    /// Current scene mode.
    pub mode: SceneMode,
    /// Battle clock.
    pub now: Duration,
    /// Resource pool.
    pub sun: u32,
    /// Human-readable status message.
    pub status: String,
    /// Card currently selected by the player.
    pub selected_card: Option<DefenderKind>,
    /// Wave schedule progress.
    pub waves: WaveProgress,
    /// Terminal outcome, once reached.
    pub outcome: Option<Outcome>,
    /// Remaining screen shake.
    pub screen_shake: Duration,
    /// Defenders ordered by identifier.
    pub defenders: Vec<DefenderSnapshot>,
    /// Attackers ordered by identifier.
    pub attackers: Vec<AttackerSnapshot>,
    /// Projectiles ordered by identifier.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Sun tokens ordered by identifier.
    pub sun_tokens: Vec<SunTokenSnapshot>,
    /// Decorative effects in creation order.
    pub effects: Vec<EffectSnapshot>,
    /// Boundary guards ordered by lane.
    pub guards: Vec<GuardSnapshot>,
    /// Remaining cooldown per card, ordered by type.
    pub cooldowns: Vec<CooldownSnapshot>,
}
