//! Named tuning constants, grouped the way systems consume them.

use std::time::Duration;

/// Aggregated tuning knobs for a battle.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    /// Board geometry in world units.
    pub board: BoardGeometry,
    /// Sun economy rules.
    pub sun: SunRules,
    /// Combat constants.
    pub combat: CombatRules,
    /// Upper bound of the resource pool.
    pub resource_cap: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            board: BoardGeometry::default(),
            sun: SunRules::default(),
            combat: CombatRules::default(),
            resource_cap: 9_999,
        }
    }
}

/// Placement of the lawn and its lanes in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardGeometry {
    /// Left edge of the first column.
    pub origin_x: f32,
    /// Top edge of the first row.
    pub origin_y: f32,
    /// Width of a single cell.
    pub cell_width: f32,
    /// Height of a single cell.
    pub cell_height: f32,
    /// Attackers at or left of this position have breached their lane.
    pub boundary_x: f32,
    /// Resting position of every boundary guard.
    pub guard_start_x: f32,
    /// Speed of a launched guard in world units per second.
    pub guard_speed: f32,
    /// Sweep reach ahead of a moving guard.
    pub guard_reach_ahead: f32,
    /// Sweep reach behind a moving guard.
    pub guard_reach_behind: f32,
    /// Distance past the far edge at which a guard leaves the board.
    pub guard_exit_margin: f32,
    /// Leftmost entry position of spawned attackers.
    pub attacker_spawn_x: f32,
    /// Random extra distance added to the entry position.
    pub attacker_spawn_jitter: f32,
}

impl BoardGeometry {
    /// Horizontal centre of the provided column.
    #[must_use]
    pub fn column_center(&self, column: u32) -> f32 {
        self.origin_x + column as f32 * self.cell_width + self.cell_width / 2.0
    }

    /// Vertical centre of the provided row.
    #[must_use]
    pub fn row_center(&self, row: u32) -> f32 {
        self.origin_y + row as f32 * self.cell_height + self.cell_height / 2.0
    }

    /// Right edge of the lawn for a grid with `columns` columns.
    #[must_use]
    pub fn far_edge(&self, columns: u32) -> f32 {
        self.origin_x + columns as f32 * self.cell_width
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            origin_x: 244.0,
            origin_y: 96.0,
            cell_width: 84.0,
            cell_height: 92.0,
            boundary_x: 208.0,
            guard_start_x: 222.0,
            guard_speed: 440.0,
            guard_reach_ahead: 50.0,
            guard_reach_behind: 120.0,
            guard_exit_margin: 180.0,
            attacker_spawn_x: 1_190.0,
            attacker_spawn_jitter: 32.0,
        }
    }
}

/// Parameters of the sun economy.
#[derive(Clone, Debug, PartialEq)]
pub struct SunRules {
    /// Interval between ambient drops; zero disables ambient sun.
    pub ambient_interval: Duration,
    /// Value of an ambient token.
    pub ambient_value: u32,
    /// Value of a token emitted by a producer.
    pub producer_value: u32,
    /// Falling speed in world units per second.
    pub fall_speed: f32,
    /// Lifetime of a producer token.
    pub token_lifetime: Duration,
    /// Extra lifetime granted to ambient tokens, which spend time falling.
    pub ambient_extra_lifetime: Duration,
    /// Delay before an ambient token is collected automatically.
    pub ambient_auto_collect: Duration,
    /// Delay before a producer token is collected automatically.
    pub producer_auto_collect: Duration,
    /// Auto-collect delay for tokens created without an explicit deadline.
    pub default_auto_collect: Duration,
    /// Maximum pointer distance for collecting a token.
    pub pickup_radius: f32,
    /// Phase advance of the horizontal drift per millisecond.
    pub drift_rate: f32,
    /// Amplitude of the per-tick horizontal drift.
    pub drift_amplitude: f32,
}

impl Default for SunRules {
    fn default() -> Self {
        Self {
            ambient_interval: Duration::from_millis(10_000),
            ambient_value: 25,
            producer_value: 25,
            fall_speed: 110.0,
            token_lifetime: Duration::from_millis(9_000),
            ambient_extra_lifetime: Duration::from_millis(3_500),
            ambient_auto_collect: Duration::from_millis(5_200),
            producer_auto_collect: Duration::from_millis(2_600),
            default_auto_collect: Duration::from_millis(4_200),
            pickup_radius: 42.0,
            drift_rate: 0.0035,
            drift_amplitude: 0.12,
        }
    }
}

/// Constants used by combat resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatRules {
    /// Time a projectile stays alive.
    pub projectile_ttl: Duration,
    /// Horizontal tolerance for a projectile to strike an attacker's body.
    pub projectile_hit_tolerance: f32,
    /// Offset of an attacker's body ahead of its position, as a cell-width fraction.
    pub attacker_body_offset: f32,
    /// Distance past the far edge at which projectiles are discarded.
    pub projectile_exit_margin: f32,
    /// Slack behind a ranged defender within which attackers still count as ahead.
    pub ranged_rear_slack: f32,
    /// Area burst radius as a multiple of the cell width.
    pub area_radius_cells: f32,
    /// Default fuse of an area burst.
    pub area_fuse: Duration,
    /// Default arming delay of a proximity mine.
    pub mine_arm_delay: Duration,
    /// Mine trigger reach ahead of the mine.
    pub mine_reach_ahead: f32,
    /// Mine trigger reach behind the mine.
    pub mine_reach_behind: f32,
    /// Minimum spacing between bite effects of a single attacker.
    pub bite_effect_interval: Duration,
    /// Screen shake emitted by an area burst.
    pub area_shake: Duration,
    /// Screen shake emitted by a proximity mine.
    pub mine_shake: Duration,
    /// Hurt flash on an attacker struck by a projectile.
    pub attacker_hurt: Duration,
    /// Hurt flash on a defender being bitten.
    pub defender_hurt: Duration,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            projectile_ttl: Duration::from_millis(6_000),
            projectile_hit_tolerance: 24.0,
            attacker_body_offset: 0.16,
            projectile_exit_margin: 130.0,
            ranged_rear_slack: 12.0,
            area_radius_cells: 1.6,
            area_fuse: Duration::from_millis(450),
            mine_arm_delay: Duration::from_millis(14_000),
            mine_reach_ahead: 26.0,
            mine_reach_behind: 30.0,
            bite_effect_interval: Duration::from_millis(200),
            area_shake: Duration::from_millis(240),
            mine_shake: Duration::from_millis(190),
            attacker_hurt: Duration::from_millis(120),
            defender_hurt: Duration::from_millis(70),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_centers_sit_in_the_middle_of_the_cell() {
        let board = BoardGeometry::default();
        assert!((board.column_center(0) - 286.0).abs() < f32::EPSILON);
        assert!((board.row_center(2) - 326.0).abs() < f32::EPSILON);
        assert!((board.far_edge(9) - 1_000.0).abs() < f32::EPSILON);
    }

    #[test]
    fn auto_collect_precedes_expiry_by_default() {
        let sun = SunRules::default();
        assert!(sun.producer_auto_collect < sun.token_lifetime);
        assert!(sun.ambient_auto_collect < sun.token_lifetime + sun.ambient_extra_lifetime);
        assert!(sun.default_auto_collect < sun.token_lifetime);
    }
}
