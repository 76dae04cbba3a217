#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects the tick driver, the
//! authoritative world, and the per-tick systems. Collaborators submit
//! [`Command`] values describing player intents, the simulation routes them to
//! the world or to the owning system, and every mutation is reported back as
//! an [`Event`] so presentation layers can cue audio and UI exactly once per
//! causing tick.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod definitions;
mod scene;
mod snapshot;
mod tuning;

pub use definitions::{
    AbilityKind, AttackerDefinition, AttackerKind, DefenderDefinition, DefenderKind, LevelConfig,
    Progress, Settings, WaveEntry,
};
pub use scene::{SceneError, SceneMode, SceneTrigger};
pub use snapshot::{
    AttackerSnapshot, CooldownSnapshot, DefenderSnapshot, EffectSnapshot, GuardSnapshot,
    ProjectileSnapshot, SunTokenSnapshot, WaveProgress, WorldSnapshot,
};
pub use tuning::{BoardGeometry, CombatRules, SunRules, Tuning};

/// Status line shown before the player has done anything in a battle.
pub const READY_STATUS: &str = "Ready to plant";

/// Commands that express every intent a collaborator may submit.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Moves from the idle menu (or a finished battle) to level selection.
    OpenLevelSelect,
    /// Opens the settings screen from the idle menu.
    OpenSettings,
    /// Leaves the settings screen.
    CloseSettings,
    /// Returns from level selection to the idle menu.
    BackToMenu,
    /// Starts a fresh battle for the configured level.
    StartBattle,
    /// Pauses an active battle or resumes a suspended one.
    TogglePause,
    /// Restarts a finished battle from scratch.
    Retry,
    /// Selects the card used by subsequent [`Command::PlaceAt`] intents.
    SelectCard {
        /// Defender type printed on the card.
        kind: DefenderKind,
    },
    /// Drops the current card selection.
    ClearSelection,
    /// Places the selected card at the provided cell.
    PlaceAt {
        /// Grid cell resolved from the pointer.
        cell: CellCoord,
    },
    /// Removes the defender occupying the provided cell.
    RemoveAt {
        /// Grid cell resolved from the pointer.
        cell: CellCoord,
    },
    /// Collects the sun token nearest to the provided board position.
    CollectAt {
        /// Horizontal board position in world units.
        x: f32,
        /// Vertical board position in world units.
        y: f32,
    },
}

/// Events broadcast after the world or a system mutated state.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the battle clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Battle clock after the advance.
        now: Duration,
    },
    /// Announces that the scene mode changed.
    SceneChanged {
        /// Mode active before the transition.
        from: SceneMode,
        /// Mode active after the transition.
        to: SceneMode,
    },
    /// Confirms that a card was selected.
    CardSelected {
        /// Defender type printed on the card.
        kind: DefenderKind,
    },
    /// Confirms that the card selection was cleared.
    SelectionCleared,
    /// Confirms that a defender was placed on the grid.
    DefenderPlaced {
        /// Identifier allocated to the defender.
        defender: DefenderId,
        /// Type of the placed defender.
        kind: DefenderKind,
        /// Cell occupied by the defender.
        cell: CellCoord,
        /// Cost debited from the resource pool.
        cost: u32,
    },
    /// Reports that a defender left the grid.
    DefenderRemoved {
        /// Identifier of the removed defender.
        defender: DefenderId,
        /// Cell the defender occupied.
        cell: CellCoord,
        /// Reason the defender was removed.
        cause: RemovalCause,
    },
    /// Reports that a placement intent was rejected.
    PlacementRejected {
        /// Cell provided in the placement intent.
        cell: CellCoord,
        /// Reason the placement failed.
        reason: IntentError,
    },
    /// Reports that a removal intent was rejected.
    RemovalRejected {
        /// Cell provided in the removal intent.
        cell: CellCoord,
        /// Reason the removal failed.
        reason: IntentError,
    },
    /// Reports that a proximity mine finished arming.
    DefenderArmed {
        /// Identifier of the armed defender.
        defender: DefenderId,
    },
    /// Reports that a defender's one-shot ability fired.
    AbilityTriggered {
        /// Identifier of the defender whose ability fired.
        defender: DefenderId,
        /// Kind of ability that fired.
        ability: AbilityKind,
        /// Number of attackers destroyed by the ability.
        kills: u32,
    },
    /// Confirms that a ranged defender fired a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Defender that fired the projectile.
        defender: DefenderId,
    },
    /// Confirms that a sun token appeared on the board.
    SunSpawned {
        /// Identifier allocated to the token.
        token: SunTokenId,
        /// Origin of the token.
        source: SunSource,
        /// Resource value of the token.
        value: u32,
    },
    /// Confirms that a sun token was collected.
    SunCollected {
        /// Identifier of the collected token.
        token: SunTokenId,
        /// Resource value credited to the pool.
        value: u32,
        /// Indicates whether the token was collected by its auto-collect deadline.
        automatic: bool,
    },
    /// Reports that a sun token expired uncollected.
    SunExpired {
        /// Identifier of the expired token.
        token: SunTokenId,
    },
    /// Confirms that an attacker entered the board.
    AttackerSpawned {
        /// Identifier allocated to the attacker.
        attacker: AttackerId,
        /// Type of the spawned attacker.
        kind: AttackerKind,
        /// Lane the attacker walks along.
        lane: u32,
        /// Indicates whether the schedule entry was a marker wave.
        marker: bool,
    },
    /// Reports that a schedule entry was skipped because its type is unknown.
    WaveEntrySkipped {
        /// Index of the skipped entry in the schedule.
        index: usize,
        /// Attacker type referenced by the entry.
        kind: AttackerKind,
    },
    /// Reports that an attacker was destroyed.
    AttackerKilled {
        /// Identifier of the destroyed attacker.
        attacker: AttackerId,
        /// Resource reward credited for the kill.
        reward: u32,
    },
    /// Reports that a lane's boundary guard was launched.
    GuardTriggered {
        /// Lane protected by the guard.
        lane: u32,
    },
    /// Announces that the battle reached its terminal outcome.
    OutcomeReached {
        /// Recorded outcome.
        outcome: Outcome,
    },
}

/// Reasons a defender may leave the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalCause {
    /// The player dug the defender up.
    Player,
    /// An attacker reduced the defender's hit points to zero.
    Eaten,
    /// The defender spent its one-shot ability.
    Consumed,
}

/// Origin of a sun token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SunSource {
    /// Periodic token dropped from above the board.
    Ambient,
    /// Token emitted by a producing defender.
    Producer(DefenderId),
}

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every scheduled attacker was dispatched and destroyed.
    Win,
    /// An attacker crossed the boundary of a lane whose guard was spent.
    Lose {
        /// Lane that was breached.
        lane: u32,
    },
}

/// Reasons a player intent may be rejected.
///
/// The display text doubles as the status message shown to the player.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum IntentError {
    /// The battle is not active.
    #[error("Battle is not active")]
    NotActive,
    /// The cell lies outside the grid.
    #[error("Invalid cell")]
    InvalidCell,
    /// The cell already holds a defender.
    #[error("Cell occupied")]
    Occupied,
    /// The cell holds no defender to remove.
    #[error("Nothing to remove")]
    Empty,
    /// The defender type is unknown or no card is selected.
    #[error("Select a card first")]
    UnknownType,
    /// The resource pool cannot cover the cost.
    #[error("Not enough sun")]
    InsufficientResource,
    /// The card's cooldown has not elapsed yet.
    #[error("Card is cooling down")]
    CoolingDown,
}

impl IntentError {
    /// Stable reason code reported to collaborators.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotActive => "not-active",
            Self::InvalidCell => "invalid-cell",
            Self::Occupied => "occupied",
            Self::Empty => "empty",
            Self::UnknownType => "unknown-type",
            Self::InsufficientResource => "insufficient-resource",
            Self::CoolingDown => "cooling-down",
        }
    }
}

/// Failure returned when dispatching a [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// A player intent was rejected.
    #[error(transparent)]
    Intent(#[from] IntentError),
    /// A lifecycle command is not legal in the current scene.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// A pointer collection found no token within reach.
    #[error("No sun within reach")]
    NothingCollected,
}

/// Unique identifier assigned to a defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an attacker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackerId(u32);

impl AttackerId {
    /// Creates a new attacker identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a sun token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SunTokenId(u32);

impl SunTokenId {
    /// Creates a new sun token identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as row (lane) and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate from a row and a column.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell, which is also its lane.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Decorative effect kinds tracked by the simulation for lifetime bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Flash at a ranged defender's muzzle.
    Muzzle,
    /// Spark where a projectile struck an attacker.
    ProjectileHit,
    /// Bite mark on a defender being eaten.
    Bite,
    /// Area or mine detonation.
    Explosion,
    /// Puff left behind by a destroyed attacker.
    Death,
    /// Dust kicked up by a launched boundary guard.
    GuardLaunch,
}
