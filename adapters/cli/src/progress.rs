//! Progress blob persistence.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use lane_defence_core::Progress;
use tracing::warn;

/// Reads progress from `path`, starting fresh when the file is missing or
/// unreadable.
pub(crate) fn load(path: &Path) -> Progress {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Progress::default(),
        Err(error) => {
            warn!(path = %path.display(), %error, "progress unreadable, starting fresh");
            return Progress::default();
        }
    };
    serde_json::from_str(&contents).unwrap_or_else(|error| {
        warn!(path = %path.display(), %error, "progress corrupt, starting fresh");
        Progress::default()
    })
}

/// Writes progress to `path` as pretty-printed JSON.
pub(crate) fn save(path: &Path, progress: &Progress) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let encoded = serde_json::to_string_pretty(progress).context("failed to encode progress")?;
    fs::write(path, encoded).with_context(|| format!("failed to write {}", path.display()))
}
