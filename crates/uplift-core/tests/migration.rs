//! End-to-end migration behavior against real project trees.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uplift_core::version::ProjectVersion;
use uplift_core::{migrate, MigrationOutcome, UpliftError};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn legacy_project(settings_json: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let configs = dir.path().join(".appkit/configs");
    std::fs::create_dir_all(&configs).unwrap();
    std::fs::write(configs.join("projectSettings.json"), settings_json).unwrap();
    dir
}

fn write_infra(dir: &TempDir, content: &str) {
    let infra = dir.path().join(".appkit/infra");
    std::fs::create_dir_all(&infra).unwrap();
    std::fs::write(infra.join("provision.bicep"), content).unwrap();
}

/// Full recursive snapshot: relative path -> file bytes (directories map to
/// an empty marker so structure differences show up too).
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap().to_path_buf();
        if path.is_dir() {
            out.insert(rel, Vec::new());
            walk(root, &path, out);
        } else {
            out.insert(rel, std::fs::read(&path).unwrap());
        }
    }
}

// ---------------------------------------------------------------------------
// No-op semantics
// ---------------------------------------------------------------------------

#[test]
fn non_upgradable_version_is_a_silent_noop() {
    let dir = legacy_project(r#"{"appName":"a","version":"1.0.0","programmingLanguage":"typescript"}"#);
    let before = snapshot(dir.path());

    let outcome = migrate(dir.path()).unwrap();
    assert_eq!(
        outcome,
        MigrationOutcome::NotNeeded(ProjectVersion::Unsupported("1.0.0".into()))
    );
    assert_eq!(before, snapshot(dir.path()), "no-op must make zero changes");
}

#[test]
fn already_current_project_is_not_needed() {
    let dir = TempDir::new().unwrap();
    let appkit = dir.path().join("appkit");
    std::fs::create_dir_all(&appkit).unwrap();
    std::fs::write(appkit.join("settings.json"), r#"{"version":"3.0.0","trackingId":"x"}"#).unwrap();

    let outcome = migrate(dir.path()).unwrap();
    assert_eq!(outcome, MigrationOutcome::NotNeeded(ProjectVersion::Current));
}

#[test]
fn missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        migrate(dir.path()),
        Err(UpliftError::ConfigRead(_))
    ));
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

#[test]
fn failed_step_rolls_back_to_byte_identical_tree() {
    // csharp has no template: the pipeline-definition step fails after the
    // settings step already wrote files.
    let dir = legacy_project(
        r#"{"appName":"a","projectId":"p","version":"2.1.0","programmingLanguage":"csharp","activePlugins":["frontend-hosting"]}"#,
    );
    let before = snapshot(dir.path());

    let err = migrate(dir.path()).unwrap_err();
    assert!(matches!(err, UpliftError::UnsupportedTarget { .. }));
    assert_eq!(
        before,
        snapshot(dir.path()),
        "project tree must match the pre-migration snapshot after rollback"
    );
}

#[test]
fn rollback_leaves_no_lock_behind() {
    let dir = legacy_project(
        r#"{"appName":"a","version":"2.1.0","programmingLanguage":"csharp"}"#,
    );
    migrate(dir.path()).unwrap_err();
    assert!(!dir.path().join(".uplift.lock").exists());
}

// ---------------------------------------------------------------------------
// Successful migration
// ---------------------------------------------------------------------------

#[test]
fn concrete_scenario_tab_and_bot_typescript() {
    let dir = legacy_project(
        r#"{
            "appName": "my-app",
            "projectId": "abc-123",
            "version": "2.1.0",
            "programmingLanguage": "typescript",
            "activePlugins": ["frontend-hosting", "bot"]
        }"#,
    );
    write_infra(
        &dir,
        "frontendHostingStorageResourceId = \"/subscriptions/s1/storage1\"\n",
    );

    assert_eq!(migrate(dir.path()).unwrap(), MigrationOutcome::Migrated);

    let settings = std::fs::read_to_string(dir.path().join("appkit/settings.json")).unwrap();
    assert!(settings.contains("\"trackingId\": \"abc-123\""));
    assert!(settings.contains("\"version\": \"3.0.0\""));

    let app_yml = std::fs::read_to_string(dir.path().join("appkit/app.yml")).unwrap();
    assert!(app_yml.contains("deploy:"));
    assert!(app_yml.contains("uses: npm/command"));
    assert!(app_yml.contains("workingDirectory: tabs"));
    assert!(app_yml.contains("resourceId: /subscriptions/s1/storage1"));

    // legacy tree untouched, backup kept for manual cleanup
    assert!(dir.path().join(".appkit/configs/projectSettings.json").exists());
    assert!(dir
        .path()
        .join(".backup/.appkit/configs/projectSettings.json")
        .exists());
    // lock released
    assert!(!dir.path().join(".uplift.lock").exists());
}

#[test]
fn fresh_tracking_id_minted_when_project_id_absent() {
    let mk = || {
        legacy_project(
            r#"{"appName":"a","version":"2.1.0","programmingLanguage":"javascript","activePlugins":["frontend-hosting"]}"#,
        )
    };
    let read_id = |dir: &TempDir| {
        let raw = std::fs::read_to_string(dir.path().join("appkit/settings.json")).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        v["trackingId"].as_str().unwrap().to_string()
    };

    let first = mk();
    migrate(first.path()).unwrap();
    let second = mk();
    migrate(second.path()).unwrap();

    let a = read_id(&first);
    let b = read_id(&second);
    assert!(!a.is_empty());
    assert_ne!(a, b, "minted tracking ids must be unique per run");
}

#[test]
fn aad_plugin_toggles_aad_actions() {
    let without = legacy_project(
        r#"{"appName":"a","version":"2.1.0","programmingLanguage":"typescript","activePlugins":["frontend-hosting"]}"#,
    );
    migrate(without.path()).unwrap();
    let yml = std::fs::read_to_string(without.path().join("appkit/app.yml")).unwrap();
    assert!(!yml.contains("aadApp/create"));
    assert!(!yml.contains("aadApp/update"));

    let with = legacy_project(
        r#"{"appName":"a","version":"2.1.0","programmingLanguage":"typescript","activePlugins":["frontend-hosting","aad"]}"#,
    );
    migrate(with.path()).unwrap();
    let yml = std::fs::read_to_string(with.path().join("appkit/app.yml")).unwrap();
    assert_eq!(yml.matches("aadApp/create").count(), 1);
    assert_eq!(yml.matches("aadApp/update").count(), 1);
}

#[test]
fn migration_without_infra_document_degrades_gracefully() {
    let dir = legacy_project(
        r#"{"appName":"a","version":"2.1.0","programmingLanguage":"typescript","activePlugins":["frontend-hosting"]}"#,
    );
    assert_eq!(migrate(dir.path()).unwrap(), MigrationOutcome::Migrated);
    let yml = std::fs::read_to_string(dir.path().join("appkit/app.yml")).unwrap();
    assert!(yml.contains("azureStorage/deploy"));
    assert!(!yml.contains("resourceId:"));
}

// ---------------------------------------------------------------------------
// Locking
// ---------------------------------------------------------------------------

#[test]
fn concurrent_migration_of_same_root_is_rejected() {
    let dir = legacy_project(
        r#"{"appName":"a","version":"2.1.0","programmingLanguage":"typescript","activePlugins":["frontend-hosting"]}"#,
    );
    // simulate a migration in flight
    std::fs::write(dir.path().join(".uplift.lock"), b"").unwrap();
    assert!(matches!(migrate(dir.path()), Err(UpliftError::Locked(_))));
}
