//! Entity construction.
//!
//! Factories build fully-initialized entities from static definitions. They
//! never validate and never touch world containers; callers insert the result.

use std::{f32::consts::TAU, time::Duration};

use lane_defence_core::{
    AbilityKind, AttackerDefinition, AttackerId, CellCoord, DefenderDefinition, DefenderId,
    ProjectileId, SunTokenId, Tuning,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::entities::{
    Attacker, Defender, DefenderBehavior, Projectile, SunToken, FALLBACK_ACTION_INTERVAL,
};

const MIN_FIRST_ACTION: Duration = Duration::from_millis(300);

/// Monotonic identifier source shared by every entity kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    fn allocate(&mut self) -> u32 {
        self.next = self.next.wrapping_add(1);
        self.next
    }
}

/// Placement parameters of a new sun token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunTokenParams {
    /// Horizontal position in world units.
    pub x: f32,
    /// Vertical position in world units.
    pub y: f32,
    /// Resource value.
    pub value: u32,
    /// Height a falling token comes to rest at; `None` creates a resting token.
    pub fall_to_y: Option<f32>,
    /// Battle time the token appears.
    pub created_at: Duration,
    /// Battle time after which the token is discarded.
    pub expires_at: Duration,
    /// Auto-collect deadline; defaults to the configured delay after creation.
    pub auto_collect_at: Option<Duration>,
}

/// Borrow of the world's identifier allocator, random source and tuning.
#[derive(Debug)]
pub struct Factory<'world> {
    pub(crate) ids: &'world mut IdAllocator,
    pub(crate) rng: &'world mut ChaCha8Rng,
    pub(crate) tuning: &'world Tuning,
}

impl Factory<'_> {
    /// Builds a defender of the provided type at `cell`, placed at `now`.
    pub fn make_defender(
        &mut self,
        definition: &DefenderDefinition,
        cell: CellCoord,
        now: Duration,
    ) -> Defender {
        let board = &self.tuning.board;
        let interval = definition.interval();
        let first_action = now
            + if interval.is_zero() {
                FALLBACK_ACTION_INTERVAL
            } else {
                interval.max(MIN_FIRST_ACTION)
            };

        let behavior = match definition.ability {
            AbilityKind::Area => DefenderBehavior::AreaBurst {
                detonate_at: now
                    + definition
                        .ability_delay()
                        .unwrap_or(self.tuning.combat.area_fuse),
            },
            AbilityKind::Proximity => DefenderBehavior::ProximityMine {
                armed: false,
                arm_at: now
                    + definition
                        .ability_delay()
                        .unwrap_or(self.tuning.combat.mine_arm_delay),
            },
            AbilityKind::Production => DefenderBehavior::Producer {
                next_yield_at: first_action,
            },
            AbilityKind::None => match definition.projectile_speed {
                Some(projectile_speed) => DefenderBehavior::Ranged {
                    projectile_speed,
                    next_shot_at: first_action,
                },
                None => DefenderBehavior::Passive,
            },
        };

        Defender {
            id: DefenderId::new(self.ids.allocate()),
            kind: definition.id.clone(),
            cell,
            x: board.column_center(cell.column()),
            y: board.row_center(cell.row()),
            hp: definition.hp,
            max_hp: definition.hp,
            attack: definition.attack,
            interval,
            behavior,
            sway_phase: self.rng.gen::<f32>() * TAU,
            hurt: Duration::ZERO,
        }
    }

    /// Builds an attacker of the provided type entering `lane`.
    pub fn make_attacker(&mut self, definition: &AttackerDefinition, lane: u32) -> Attacker {
        let board = &self.tuning.board;
        let x = board.attacker_spawn_x + self.rng.gen::<f32>() * board.attacker_spawn_jitter;
        let walk_phase = self.rng.gen::<f32>() * TAU;
        Attacker {
            id: AttackerId::new(self.ids.allocate()),
            kind: definition.id.clone(),
            lane,
            x,
            hp: definition.hp,
            max_hp: definition.hp,
            speed: definition.speed,
            dps: definition.dps,
            reward: definition.reward,
            target: None,
            walk_phase,
            hurt: Duration::ZERO,
            next_bite_effect_at: Duration::ZERO,
        }
    }

    /// Builds a projectile leaving `(x, y)` down `lane`.
    pub fn make_projectile(
        &mut self,
        lane: u32,
        x: f32,
        y: f32,
        damage: f32,
        speed: f32,
    ) -> Projectile {
        Projectile {
            id: ProjectileId::new(self.ids.allocate()),
            lane,
            x,
            y,
            damage,
            speed,
            ttl: self.tuning.combat.projectile_ttl,
        }
    }

    /// Builds a sun token from the provided placement parameters.
    pub fn make_sun_token(&mut self, params: SunTokenParams) -> SunToken {
        SunToken {
            id: SunTokenId::new(self.ids.allocate()),
            x: params.x,
            y: params.y,
            value: params.value,
            falling: params.fall_to_y.is_some(),
            fall_to_y: params.fall_to_y.unwrap_or(params.y),
            created_at: params.created_at,
            expires_at: params.expires_at,
            auto_collect_at: params
                .auto_collect_at
                .unwrap_or(params.created_at + self.tuning.sun.default_auto_collect),
            drift_phase: self.rng.gen::<f32>() * TAU,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_core::{AttackerKind, DefenderKind};
    use rand::SeedableRng;

    fn definition(ability: AbilityKind, projectile_speed: Option<f32>) -> DefenderDefinition {
        DefenderDefinition {
            id: DefenderKind::new("probe"),
            name: String::from("Probe"),
            cost: 50,
            cooldown_ms: 7_500,
            hp: 300.0,
            attack: 20.0,
            interval_ms: 1_400,
            projectile_speed,
            ability,
            ability_ms: None,
        }
    }

    fn with_factory<R>(run: impl FnOnce(&mut Factory<'_>) -> R) -> R {
        let mut ids = IdAllocator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tuning = Tuning::default();
        let mut factory = Factory {
            ids: &mut ids,
            rng: &mut rng,
            tuning: &tuning,
        };
        run(&mut factory)
    }

    #[test]
    fn ranged_defender_waits_one_interval_before_first_shot() {
        let defender = with_factory(|factory| {
            factory.make_defender(
                &definition(AbilityKind::None, Some(260.0)),
                CellCoord::new(0, 0),
                Duration::from_secs(1),
            )
        });
        assert_eq!(
            defender.behavior,
            DefenderBehavior::Ranged {
                projectile_speed: 260.0,
                next_shot_at: Duration::from_millis(2_400),
            }
        );
        assert!((defender.x - 286.0).abs() < f32::EPSILON);
        assert!((defender.y - 142.0).abs() < f32::EPSILON);
    }

    #[test]
    fn mines_start_unarmed_with_default_delay() {
        let defender = with_factory(|factory| {
            factory.make_defender(
                &definition(AbilityKind::Proximity, None),
                CellCoord::new(1, 1),
                Duration::ZERO,
            )
        });
        assert_eq!(
            defender.behavior,
            DefenderBehavior::ProximityMine {
                armed: false,
                arm_at: Duration::from_millis(14_000),
            }
        );
    }

    #[test]
    fn attackers_enter_within_spawn_jitter() {
        let attacker = with_factory(|factory| {
            factory.make_attacker(
                &AttackerDefinition {
                    id: AttackerKind::new("normal"),
                    hp: 270.0,
                    speed: 18.0,
                    dps: 36.0,
                    reward: 0,
                },
                3,
            )
        });
        assert!(attacker.x >= 1_190.0 && attacker.x <= 1_222.0);
        assert_eq!(attacker.lane, 3);
        assert_eq!(attacker.target, None);
    }

    #[test]
    fn sun_tokens_default_auto_collect_deadline() {
        let token = with_factory(|factory| {
            factory.make_sun_token(SunTokenParams {
                x: 300.0,
                y: 220.0,
                value: 25,
                fall_to_y: None,
                created_at: Duration::from_secs(2),
                expires_at: Duration::from_secs(7),
                auto_collect_at: None,
            })
        });
        assert!(!token.falling);
        assert_eq!(token.auto_collect_at, Duration::from_millis(6_200));
    }

    #[test]
    fn identifiers_are_unique_across_kinds() {
        let (first, second) = with_factory(|factory| {
            let shot = factory.make_projectile(0, 0.0, 0.0, 1.0, 1.0);
            let defender = factory.make_defender(
                &definition(AbilityKind::None, None),
                CellCoord::new(0, 0),
                Duration::ZERO,
            );
            (shot.id.get(), defender.id.get())
        });
        assert_ne!(first, second);
    }
}
