use crate::error::{Result, UpliftError};
use crate::paths;
use std::path::{Path, PathBuf};

/// Project-level exclusive lock.
///
/// Two concurrent migrations of the same root would corrupt each other's
/// backup and ledger, so the coordinator acquires this before any pipeline
/// work and holds it until commit or rollback. Migrations of different roots
/// share no state and need no coordination.
pub struct ProjectLock {
    path: PathBuf,
}

impl ProjectLock {
    pub fn acquire(root: &Path) -> Result<Self> {
        let path = paths::lock_path(root);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(UpliftError::Locked(root.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for ProjectLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to release project lock");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_is_exclusive() {
        let dir = TempDir::new().unwrap();
        let _held = ProjectLock::acquire(dir.path()).unwrap();
        assert!(matches!(
            ProjectLock::acquire(dir.path()),
            Err(UpliftError::Locked(_))
        ));
    }

    #[test]
    fn lock_released_on_drop() {
        let dir = TempDir::new().unwrap();
        {
            let _held = ProjectLock::acquire(dir.path()).unwrap();
        }
        assert!(ProjectLock::acquire(dir.path()).is_ok());
    }
}
