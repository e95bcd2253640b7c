use crate::error::{Result, UpliftError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Schema version written into regenerated settings.
pub const TARGET_VERSION: &str = "3.0.0";

// ---------------------------------------------------------------------------
// HostType / Language
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostType {
    Azure,
    Spfx,
}

impl HostType {
    pub fn as_str(self) -> &'static str {
        match self {
            HostType::Azure => "azure",
            HostType::Spfx => "spfx",
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Csharp,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Csharp => "csharp",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OldProjectSettings
// ---------------------------------------------------------------------------

/// Read-only snapshot of a v2 project's `projectSettings.json`.
///
/// Loaded once per migration attempt and never mutated; steps share it by
/// reference through the pipeline context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OldProjectSettings {
    pub app_name: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub programming_language: Language,
    #[serde(default = "default_host_type")]
    pub host_type: HostType,
    #[serde(default)]
    pub active_plugins: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

fn default_host_type() -> HostType {
    HostType::Azure
}

impl OldProjectSettings {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::legacy_settings_path(root);
        let data = std::fs::read_to_string(&path)
            .map_err(|e| UpliftError::ConfigRead(format!("{}: {e}", path.display())))?;
        let settings: OldProjectSettings = serde_json::from_str(&data)
            .map_err(|e| UpliftError::ConfigRead(format!("{}: {e}", path.display())))?;
        Ok(settings)
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.active_plugins.iter().any(|p| p == name)
    }
}

// ---------------------------------------------------------------------------
// GeneratedSettings
// ---------------------------------------------------------------------------

/// The v3 `settings.json` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSettings {
    pub version: String,
    pub tracking_id: String,
}

impl GeneratedSettings {
    /// Regenerate settings from the old project, preserving its identity.
    ///
    /// The tracking id carries over from `projectId` when present; otherwise a
    /// fresh one is minted. This is the only place in the pipeline allowed to
    /// fabricate new identity data.
    pub fn regenerate(old: &OldProjectSettings) -> Self {
        let tracking_id = old
            .project_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self {
            version: TARGET_VERSION.to_string(),
            tracking_id,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
