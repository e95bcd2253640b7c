use crate::error::{Result, UpliftError};
use crate::paths;
use crate::settings::TARGET_VERSION;
use std::path::Path;

/// The single v2 schema version the pipeline knows how to upgrade.
///
/// Deliberately an exact match, not a range: multi-version upgrade chains are
/// out of scope for one pipeline run. A future schema bump adds a new oracle
/// rule, not pipeline changes.
pub const UPGRADABLE_VERSION: &str = "2.1.0";

// ---------------------------------------------------------------------------
// ProjectVersion
// ---------------------------------------------------------------------------

/// Classification of a project's declared schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectVersion {
    /// Legacy config exists but carries no version field.
    Unversioned,
    /// Exactly the version this engine upgrades from.
    Upgradable(String),
    /// Already on the target layout.
    Current,
    /// A version this engine does not know how to handle.
    Unsupported(String),
}

impl ProjectVersion {
    pub fn as_str(&self) -> &str {
        match self {
            ProjectVersion::Unversioned => "unversioned",
            ProjectVersion::Upgradable(_) => "upgradable",
            ProjectVersion::Current => "current",
            ProjectVersion::Unsupported(_) => "unsupported",
        }
    }
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

/// Read the project's declared schema version and classify it.
///
/// Checks known locations in order: the v3 `settings.json` (already current),
/// then the legacy `projectSettings.json`. Fails with a config-read error when
/// no recognizable version marker exists anywhere. Never mutates.
pub fn classify(root: &Path) -> Result<ProjectVersion> {
    if paths::settings_path(root).exists() {
        return Ok(ProjectVersion::Current);
    }

    let legacy = paths::legacy_settings_path(root);
    if !legacy.exists() {
        return Err(UpliftError::ConfigRead(format!(
            "no version marker found under {}",
            root.display()
        )));
    }

    let data = std::fs::read_to_string(&legacy)
        .map_err(|e| UpliftError::ConfigRead(format!("{}: {e}", legacy.display())))?;
    let value: serde_json::Value = serde_json::from_str(&data)
        .map_err(|e| UpliftError::ConfigRead(format!("{}: {e}", legacy.display())))?;

    match value.get("version").and_then(|v| v.as_str()) {
        None => Ok(ProjectVersion::Unversioned),
        Some(UPGRADABLE_VERSION) => Ok(ProjectVersion::Upgradable(UPGRADABLE_VERSION.to_string())),
        Some(v) if v == TARGET_VERSION => Ok(ProjectVersion::Current),
        Some(v) => Ok(ProjectVersion::Unsupported(v.to_string())),
    }
}

/// True only for the single known upgradable version.
pub fn is_migratable(version: &ProjectVersion) -> bool {
    matches!(version, ProjectVersion::Upgradable(v) if v == UPGRADABLE_VERSION)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
