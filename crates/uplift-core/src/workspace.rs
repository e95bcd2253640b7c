//! Transactional working copy of one project root.
//!
//! Every mutating primitive records its target path(s) in the ledger before
//! touching the filesystem, so the ledger is always a superset of the files
//! this run is responsible for. Rollback replays the ledger deepest-first,
//! then restores backed-up directories.

use crate::error::{Result, UpliftError};
use crate::io;
use crate::paths;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub struct MigrationWorkspace {
    root: PathBuf,
    backup_root: PathBuf,
    /// Relative paths created or written this run. `BTreeSet` collapses
    /// duplicates and sorts parents before children; reverse iteration gives
    /// the deepest-first order deletion needs.
    modified: BTreeSet<PathBuf>,
    /// Relative directories copied into the backup root.
    backed_up: BTreeSet<PathBuf>,
}

impl MigrationWorkspace {
    /// Bind a workspace to `root` for the lifetime of one migration attempt.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            backup_root: paths::backup_dir(root),
            modified: BTreeSet::new(),
            backed_up: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    // -----------------------------------------------------------------------
    // Backup
    // -----------------------------------------------------------------------

    /// Snapshot `rel_dir` into the backup root.
    ///
    /// Returns `false` (a no-op, not an error) when the source directory does
    /// not exist. Repeated calls for the same directory overwrite the previous
    /// snapshot. Backups are read-only w.r.t. the live tree, so nothing is
    /// recorded in the ledger.
    pub fn backup(&mut self, rel_dir: impl AsRef<Path>) -> Result<bool> {
        let rel_dir = rel_dir.as_ref();
        let src = self.root.join(rel_dir);
        if !src.is_dir() {
            return Ok(false);
        }
        let dst = self.backup_root.join(rel_dir);
        if dst.exists() {
            std::fs::remove_dir_all(&dst)?;
        }
        io::copy_dir_recursive(&src, &dst)?;
        self.backed_up.insert(rel_dir.to_path_buf());
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Mutating primitives
    // -----------------------------------------------------------------------

    /// Write `content` to `rel`, creating parent directories as needed.
    pub fn write_file(&mut self, rel: impl AsRef<Path>, content: &[u8]) -> Result<()> {
        let rel = rel.as_ref();
        self.record_new_parents(rel);
        self.modified.insert(rel.to_path_buf());
        io::atomic_write(&self.root.join(rel), content)
    }

    /// Copy `src_rel` to `dst_rel`, recording the destination.
    pub fn copy(&mut self, src_rel: impl AsRef<Path>, dst_rel: impl AsRef<Path>) -> Result<()> {
        let dst_rel = dst_rel.as_ref();
        self.record_new_parents(dst_rel);
        self.modified.insert(dst_rel.to_path_buf());
        let dst = self.root.join(dst_rel);
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(self.root.join(src_rel.as_ref()), &dst)?;
        Ok(())
    }

    /// Create `rel` (and missing intermediates), recording every directory
    /// segment that was newly created so rollback can remove them precisely.
    pub fn ensure_dir(&mut self, rel: impl AsRef<Path>) -> Result<()> {
        let rel = rel.as_ref();
        let mut partial = PathBuf::new();
        for component in rel.components() {
            partial.push(component);
            if !self.root.join(&partial).exists() {
                self.modified.insert(partial.clone());
            }
        }
        io::ensure_dir(&self.root.join(rel))
    }

    /// Create an empty file at `rel`.
    ///
    /// Strict: fails when the path already exists. A pipeline step creating
    /// the same path twice in one run is a bug worth surfacing.
    pub fn create_file(&mut self, rel: impl AsRef<Path>) -> Result<()> {
        let rel = rel.as_ref();
        let full = self.root.join(rel);
        if full.exists() {
            return Err(UpliftError::AlreadyExists(rel.to_path_buf()));
        }
        self.record_new_parents(rel);
        self.modified.insert(rel.to_path_buf());
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Ledger
    // -----------------------------------------------------------------------

    /// Read-only snapshot of every path this run created or wrote.
    pub fn modified_paths(&self) -> &BTreeSet<PathBuf> {
        &self.modified
    }

    /// Delete every tracked path from the live tree, then clear the ledger.
    ///
    /// Deletes deepest paths first so directories are empty by the time their
    /// entry is reached. Best-effort: individual failures are logged and the
    /// sweep continues, since leaving stray generated files behind is worse
    /// than a noisy warning.
    pub fn clean_modified_paths(&mut self) -> Result<()> {
        for rel in self.modified.iter().rev() {
            let full = self.root.join(rel);
            let meta = match std::fs::symlink_metadata(&full) {
                Ok(m) => m,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::warn!(path = %full.display(), error = %e, "failed to stat tracked path");
                    continue;
                }
            };
            let removed = if meta.is_dir() {
                std::fs::remove_dir(&full)
            } else {
                std::fs::remove_file(&full)
            };
            if let Err(e) = removed {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %full.display(), error = %e, "failed to remove tracked path");
                }
            }
        }
        self.modified.clear();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Restore
    // -----------------------------------------------------------------------

    /// Copy every backed-up directory back over the live tree.
    ///
    /// Does not clear the ledger; callers sequence cleanup themselves.
    pub fn restore_backup(&self) -> Result<()> {
        for rel in &self.backed_up {
            io::copy_dir_recursive(&self.backup_root.join(rel), &self.root.join(rel))?;
        }
        Ok(())
    }

    /// Remove the backup root once it is no longer needed.
    pub fn clean_backup(&mut self) -> Result<()> {
        if self.backup_root.exists() {
            std::fs::remove_dir_all(&self.backup_root)?;
        }
        self.backed_up.clear();
        Ok(())
    }

    /// Undo everything this run did: clean tracked paths, restore backups,
    /// drop the backup root — in that exact order, best-effort throughout.
    pub fn rollback(&mut self) {
        if let Err(e) = self.clean_modified_paths() {
            tracing::warn!(error = %e, "rollback: cleaning tracked paths failed");
        }
        if let Err(e) = self.restore_backup() {
            tracing::warn!(error = %e, "rollback: restoring backup failed");
        }
        if let Err(e) = self.clean_backup() {
            tracing::warn!(error = %e, "rollback: removing backup root failed");
        }
    }

    fn record_new_parents(&mut self, rel: &Path) {
        let mut partial = PathBuf::new();
        let Some(parent) = rel.parent() else {
            return;
        };
        for component in parent.components() {
            partial.push(component);
            if !self.root.join(&partial).exists() {
                self.modified.insert(partial.clone());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
