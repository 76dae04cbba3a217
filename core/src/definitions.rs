//! Static tables supplied by collaborators and the opaque blobs they persist.

use std::{collections::BTreeMap, fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::Outcome;

/// Type identifier of a defender card, such as `"peashooter"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefenderKind(String);

impl DefenderKind {
    /// Creates a defender type identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the textual identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DefenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Type identifier of an attacker, such as `"normal"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttackerKind(String);

impl AttackerKind {
    /// Creates an attacker type identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the textual identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Special behaviour attached to a defender type.
///
/// Ranged defenders carry no ability; they are recognised by their projectile
/// speed instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbilityKind {
    /// No special behaviour.
    #[default]
    None,
    /// Detonates once after a fuse, destroying every attacker nearby.
    Area,
    /// Arms after a delay, then destroys the first attacker that steps on it.
    Proximity,
    /// Periodically produces sun tokens.
    Production,
}

/// Row of the defender type table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefenderDefinition {
    /// Type identifier printed on the card.
    pub id: DefenderKind,
    /// Human-readable name used in status messages.
    pub name: String,
    /// Resource cost debited on placement.
    pub cost: u32,
    /// Card cooldown after a successful placement, in milliseconds.
    pub cooldown_ms: u64,
    /// Starting hit points.
    pub hp: f32,
    /// Damage dealt per projectile.
    #[serde(default)]
    pub attack: f32,
    /// Interval between actions (shots or sun yields), in milliseconds.
    #[serde(default)]
    pub interval_ms: u64,
    /// Projectile speed in world units per second; present only for ranged types.
    #[serde(default)]
    pub projectile_speed: Option<f32>,
    /// Special behaviour of the type.
    #[serde(default)]
    pub ability: AbilityKind,
    /// Fuse or arming delay of the ability, in milliseconds.
    #[serde(default)]
    pub ability_ms: Option<u64>,
}

impl DefenderDefinition {
    /// Card cooldown as a duration.
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Action interval as a duration.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Ability fuse or arming delay, if the table specifies one.
    #[must_use]
    pub fn ability_delay(&self) -> Option<Duration> {
        self.ability_ms.map(Duration::from_millis)
    }
}

/// Row of the attacker type table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackerDefinition {
    /// Type identifier referenced by the wave schedule.
    pub id: AttackerKind,
    /// Starting hit points.
    pub hp: f32,
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Damage per second dealt to the defender being bitten.
    pub dps: f32,
    /// Resource credited when the attacker is destroyed by damage.
    #[serde(default)]
    pub reward: u32,
}

/// Single entry of the static wave schedule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    /// Offset from battle start, in seconds.
    pub at_sec: f32,
    /// Lane the attacker enters.
    pub row: u32,
    /// Attacker type to spawn.
    #[serde(rename = "type")]
    pub kind: AttackerKind,
    /// Marks the opening entry of a large wave.
    #[serde(default)]
    pub marker: bool,
}

impl WaveEntry {
    /// Offset from battle start; malformed offsets collapse to zero.
    #[must_use]
    pub fn offset(&self) -> Duration {
        Duration::try_from_secs_f32(self.at_sec).unwrap_or(Duration::ZERO)
    }
}

/// Static description of a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Level identifier recorded in progress.
    pub id: String,
    /// Number of lanes.
    pub rows: u32,
    /// Number of columns per lane.
    pub columns: u32,
    /// Resource pool at battle start.
    pub initial_sun: u32,
    /// Number of waves advertised to the player.
    #[serde(default)]
    pub waves: u32,
    /// Attacker dispatch schedule, ordered by offset.
    #[serde(default)]
    pub spawn_table: Vec<WaveEntry>,
}

/// Persisted campaign progress.
///
/// The engine only touches the completion flags and the last played level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Completion flag per level identifier.
    #[serde(default)]
    pub completed_levels: BTreeMap<String, bool>,
    /// Identifier of the most recently completed level.
    #[serde(default)]
    pub last_level_id: Option<String>,
}

impl Progress {
    /// Records a terminal outcome for the provided level.
    pub fn record(&mut self, level_id: &str, outcome: Outcome) {
        if outcome == Outcome::Win {
            let _ = self.completed_levels.insert(level_id.to_owned(), true);
            self.last_level_id = Some(level_id.to_owned());
        }
    }

    /// Reports whether the level has been completed.
    #[must_use]
    pub fn is_completed(&self, level_id: &str) -> bool {
        self.completed_levels.get(level_id).copied().unwrap_or(false)
    }
}

/// Persisted player settings, carried verbatim by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume in `[0, 1]`.
    pub volume: f32,
    /// Interface language tag.
    pub language: String,
    /// Mutes all audio when set.
    #[serde(default)]
    pub muted: bool,
}

impl Settings {
    /// Returns a copy with out-of-range values pulled back into range.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Self::default().volume
        };
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            language: String::from("zh-CN"),
            muted: false,
        }
    }
}
