//! Coarse scene modes and the table of legal transitions between them.

use serde::{Deserialize, Serialize};

/// Describes which part of the experience is currently in control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneMode {
    /// Main menu; no battle systems run.
    #[default]
    Idle,
    /// Level selection.
    Selecting,
    /// Settings screen.
    Configuring,
    /// Battle in progress; every per-tick system runs.
    Active,
    /// Battle paused; systems are skipped and the clock is frozen.
    Suspended,
    /// Battle finished with a recorded outcome.
    Terminal,
}

impl SceneMode {
    /// Resolves the mode reached by applying `trigger`, or `None` when illegal.
    #[must_use]
    pub const fn next(self, trigger: SceneTrigger) -> Option<Self> {
        use SceneMode::{Active, Configuring, Idle, Selecting, Suspended, Terminal};
        use SceneTrigger as T;

        match (self, trigger) {
            (Idle, T::OpenLevelSelect) => Some(Selecting),
            (Idle, T::OpenSettings) => Some(Configuring),
            (Configuring, T::CloseSettings) => Some(Idle),
            (Selecting, T::BackToMenu) => Some(Idle),
            (Selecting, T::StartBattle) => Some(Active),
            (Active, T::TogglePause) => Some(Suspended),
            (Suspended, T::TogglePause) => Some(Active),
            (Active, T::OutcomeReached) => Some(Terminal),
            (Terminal, T::Retry) => Some(Active),
            (Terminal, T::OpenLevelSelect) => Some(Selecting),
            _ => None,
        }
    }

    /// Reports whether the battle systems should run.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Reports whether a battle exists, running or not.
    #[must_use]
    pub const fn in_battle(self) -> bool {
        matches!(self, Self::Active | Self::Suspended | Self::Terminal)
    }
}

/// Inputs that drive the scene state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneTrigger {
    /// Player opened level selection.
    OpenLevelSelect,
    /// Player opened settings.
    OpenSettings,
    /// Player closed settings.
    CloseSettings,
    /// Player backed out of level selection.
    BackToMenu,
    /// Player started a battle.
    StartBattle,
    /// Player toggled pause.
    TogglePause,
    /// The battle recorded a win or a loss.
    OutcomeReached,
    /// Player asked to replay the finished battle.
    Retry,
}

/// Raised when a trigger is not legal from the current mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply {trigger:?} while in {from:?}")]
pub struct SceneError {
    /// Mode that rejected the trigger.
    pub from: SceneMode,
    /// Rejected trigger.
    pub trigger: SceneTrigger,
}
