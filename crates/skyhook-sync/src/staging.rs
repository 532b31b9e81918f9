//! Staging area preparation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to remove previous staging tree at {}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create staging directory {}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Wipe and recreate the staging directory.
///
/// Anything left from a previous run is deleted irreversibly; callers must
/// only ever pass a path that holds prior staging artifacts. Failure to
/// remove is surfaced, not retried.
pub fn prepare(path: &Path) -> Result<(), StagingError> {
    if path.exists() {
        info!(path = %path.display(), "cleaning old staging files");
        fs::remove_dir_all(path).map_err(|source| StagingError::Remove {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::create_dir_all(path).map_err(|source| StagingError::Create {
        path: path.to_path_buf(),
        source,
    })
}
