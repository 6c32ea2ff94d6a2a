//! Working directory resets and the scratch area between reader and merger.

use crate::error::GlueGenError;
use crate::models::{SanitizedRecord, StagedRecord};
use crate::output::{load_json, save_json, to_sorted_json};
use crate::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Deletes `path` recursively if it exists, then creates it empty.
///
/// # Errors
/// Returns [`GlueGenError::DirectoryReset`] if the old tree cannot be removed
/// or the new directory cannot be created. A tree that disappears between the
/// check and the removal is not an error.
pub async fn reset_directory(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => debug!("Removed existing directory {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            error!("Removal of the directory {} failed: {}", path.display(), e);
            return Err(GlueGenError::DirectoryReset {
                path: path.to_path_buf(),
                source: e,
            });
        }
    }

    tokio::fs::create_dir_all(path).await.map_err(|e| {
        error!("Creation of the directory {} failed: {}", path.display(), e);
        GlueGenError::DirectoryReset {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    info!("Successfully created the directory {}", path.display());
    Ok(())
}

/// Scratch directory holding one `{"GLUE": record}` file per staged object.
#[derive(Debug, Clone)]
pub struct ScratchArea {
    dir: PathBuf,
}

impl ScratchArea {
    /// Uses `dir` as the scratch location. The directory is not created here;
    /// see [`reset_directory`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the scratch file for `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Writes `record` wrapped under `GLUE` to `name`, overwriting.
    pub async fn stage(&self, name: &str, record: SanitizedRecord) -> Result<PathBuf> {
        let path = self.path_for(name);
        let staged = StagedRecord { record };

        info!("Writing {} to {}", name, path.display());
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!("{}", to_sorted_json(&staged)?);
        }

        save_json(&staged, &path).await?;
        Ok(path)
    }

    /// Reads the record staged under `name`.
    ///
    /// # Errors
    /// [`GlueGenError::MissingStagedRecord`] if nothing was staged under that
    /// name, which is what happens when the object was absent upstream.
    pub async fn load(&self, name: &str) -> Result<SanitizedRecord> {
        let path = self.path_for(name);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(GlueGenError::MissingStagedRecord {
                    name: name.to_string(),
                    path,
                });
            }
            Err(e) => return Err(GlueGenError::io("inspect", &path, e)),
        }

        let staged: StagedRecord = load_json(&path).await?;
        Ok(staged.record)
    }
}
