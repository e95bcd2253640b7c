use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Hidden directory holding the v2 (legacy) configuration tree.
pub const LEGACY_DIR: &str = ".appkit";
pub const LEGACY_SETTINGS_FILE: &str = ".appkit/configs/projectSettings.json";
pub const LEGACY_INFRA_FILE: &str = ".appkit/infra/provision.bicep";

/// Visible directory holding the v3 configuration tree.
pub const NEW_CONFIG_DIR: &str = "appkit";
pub const SETTINGS_FILE: &str = "appkit/settings.json";
pub const APP_YML_FILE: &str = "appkit/app.yml";

/// Pre-migration snapshot location, not part of committed project state.
pub const BACKUP_DIR: &str = ".backup";

pub const LOCK_FILE: &str = ".uplift.lock";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn legacy_dir(root: &Path) -> PathBuf {
    root.join(LEGACY_DIR)
}

pub fn legacy_settings_path(root: &Path) -> PathBuf {
    root.join(LEGACY_SETTINGS_FILE)
}

pub fn legacy_infra_path(root: &Path) -> PathBuf {
    root.join(LEGACY_INFRA_FILE)
}

pub fn new_config_dir(root: &Path) -> PathBuf {
    root.join(NEW_CONFIG_DIR)
}

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

pub fn app_yml_path(root: &Path) -> PathBuf {
    root.join(APP_YML_FILE)
}

pub fn backup_dir(root: &Path) -> PathBuf {
    root.join(BACKUP_DIR)
}

pub fn lock_path(root: &Path) -> PathBuf {
    root.join(LOCK_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            legacy_settings_path(root),
            PathBuf::from("/tmp/proj/.appkit/configs/projectSettings.json")
        );
        assert_eq!(settings_path(root), PathBuf::from("/tmp/proj/appkit/settings.json"));
        assert_eq!(app_yml_path(root), PathBuf::from("/tmp/proj/appkit/app.yml"));
        assert_eq!(backup_dir(root), PathBuf::from("/tmp/proj/.backup"));
    }
}
