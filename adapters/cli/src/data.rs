//! Loading and validation of the static tables shipped next to the binary.

use std::{collections::BTreeSet, fs, path::Path};

use anyhow::{Context, Result};
use lane_defence_core::{AttackerDefinition, DefenderDefinition, LevelConfig};
use serde::Deserialize;
use tracing::warn;

use crate::script::ScriptedPlacement;

/// Validation failures that make a data set unusable.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum DataError {
    #[error("defender table lists `{0}` more than once")]
    DuplicateDefender(String),
    #[error("attacker table lists `{0}` more than once")]
    DuplicateAttacker(String),
    #[error("level `{level}` has an empty {rows}x{columns} grid")]
    EmptyGrid {
        level: String,
        rows: u32,
        columns: u32,
    },
}

#[derive(Debug, Deserialize)]
struct DefenderTable {
    #[serde(rename = "defender", default)]
    defenders: Vec<DefenderDefinition>,
}

#[derive(Debug, Deserialize)]
struct AttackerTable {
    #[serde(rename = "attacker", default)]
    attackers: Vec<AttackerDefinition>,
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    #[serde(flatten)]
    level: LevelConfig,
    #[serde(default)]
    script: Vec<ScriptedPlacement>,
}

/// Everything a headless battle needs.
#[derive(Debug)]
pub(crate) struct DataSet {
    pub(crate) defenders: Vec<DefenderDefinition>,
    pub(crate) attackers: Vec<AttackerDefinition>,
    pub(crate) level: LevelConfig,
    pub(crate) script: Vec<ScriptedPlacement>,
}

impl DataSet {
    /// Reads `defenders.toml`, `attackers.toml` and `levels/<level>.toml`
    /// from `data_dir`.
    pub(crate) fn load(data_dir: &Path, level_id: &str) -> Result<Self> {
        let defenders = read(&data_dir.join("defenders.toml"))?;
        let attackers = read(&data_dir.join("attackers.toml"))?;
        let level_path = data_dir.join("levels").join(format!("{level_id}.toml"));
        let level = read(&level_path)?;
        Self::parse(&defenders, &attackers, &level)
            .with_context(|| format!("invalid data set in {}", data_dir.display()))
    }

    /// Parses and validates the three tables from their TOML sources.
    pub(crate) fn parse(defenders: &str, attackers: &str, level: &str) -> Result<Self> {
        let DefenderTable { defenders } =
            toml::from_str(defenders).context("failed to parse defender table")?;
        let AttackerTable { attackers } =
            toml::from_str(attackers).context("failed to parse attacker table")?;
        let LevelFile { level, script } =
            toml::from_str(level).context("failed to parse level toml contents")?;

        let data = Self {
            defenders,
            attackers,
            level,
            script,
        };
        data.validate()?;
        Ok(data)
    }

    /// Rejects tables the engine cannot run and warns about entries it will skip.
    pub(crate) fn validate(&self) -> Result<(), DataError> {
        let mut defender_ids = BTreeSet::new();
        for definition in &self.defenders {
            if !defender_ids.insert(definition.id.as_str()) {
                return Err(DataError::DuplicateDefender(definition.id.to_string()));
            }
        }

        let mut attacker_ids = BTreeSet::new();
        for definition in &self.attackers {
            if !attacker_ids.insert(definition.id.as_str()) {
                return Err(DataError::DuplicateAttacker(definition.id.to_string()));
            }
        }

        let level = &self.level;
        if level.rows == 0 || level.columns == 0 {
            return Err(DataError::EmptyGrid {
                level: level.id.clone(),
                rows: level.rows,
                columns: level.columns,
            });
        }

        for (index, entry) in level.spawn_table.iter().enumerate() {
            if !attacker_ids.contains(entry.kind.as_str()) {
                warn!(index, kind = %entry.kind, "schedule entry references an unknown attacker");
            }
            if entry.row >= level.rows {
                warn!(index, row = entry.row, "schedule entry lane lies outside the grid");
            }
        }

        for placement in &self.script {
            if !defender_ids.contains(placement.card.as_str()) {
                warn!(card = %placement.card, at_ms = placement.at_ms, "script references an unknown card");
            }
            if placement.row >= level.rows || placement.col >= level.columns {
                warn!(
                    row = placement.row,
                    col = placement.col,
                    "script placement lies outside the grid"
                );
            }
        }

        Ok(())
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
