//! Migration entry point: applicability check, lock, pipeline, commit or
//! rollback. A run terminates in exactly one of two states — committed (ledger
//! discarded) or rolled back (workspace restored, original error propagated).

use crate::error::Result;
use crate::lock::ProjectLock;
use crate::pipeline::{self, StepContext};
use crate::version::{self, ProjectVersion};
use crate::workspace::MigrationWorkspace;
use std::path::Path;

/// What a `migrate` call did. Callers must be able to tell "nothing to do"
/// apart from "migrated".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Migrated,
    NotNeeded(ProjectVersion),
}

/// Upgrade the project at `root` to the v3 layout.
///
/// A project whose version is not the single upgradable one is a success
/// no-op. Any step failure triggers a full rollback and propagates the
/// original error unwrapped. On success the tracked-path ledger is discarded
/// and the backup is left in place for manual cleanup.
pub fn migrate(root: &Path) -> Result<MigrationOutcome> {
    let version = version::classify(root)?;
    if !version::is_migratable(&version) {
        tracing::debug!(version = version.as_str(), "migration not applicable");
        return Ok(MigrationOutcome::NotNeeded(version));
    }

    let _lock = ProjectLock::acquire(root)?;

    let mut cx = StepContext::new(MigrationWorkspace::new(root));
    for step in pipeline::default_steps() {
        if let Err(e) = pipeline::run_step(pipeline::default_middleware(), step.as_ref(), &mut cx) {
            tracing::warn!(step = step.name(), "rolling back migration");
            cx.workspace.rollback();
            return Err(e);
        }
    }

    tracing::info!(root = %root.display(), "migration committed");
    Ok(MigrationOutcome::Migrated)
}
