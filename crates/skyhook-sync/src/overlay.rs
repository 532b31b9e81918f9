//! Local configuration overlay.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("cannot create bundle root {}", path.display())]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {} to {}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Copy the operator's local configuration file into the bundle root,
/// overwriting any default the bundle shipped with.
///
/// Configuration sync is optional: a missing local file is a logged no-op
/// (`Ok(false)`). The local file is only ever read, never moved. Copy
/// failures are returned for the caller to report; the run continues with
/// whatever configuration the bundle carries.
pub fn overlay(source: &Path, bundle_root: &Path, file_name: &str) -> Result<bool, OverlayError> {
    if !source.exists() {
        info!("no local configuration file found, skipping config sync");
        return Ok(false);
    }

    fs::create_dir_all(bundle_root).map_err(|e| OverlayError::CreateRoot {
        path: bundle_root.to_path_buf(),
        source: e,
    })?;

    let dest = bundle_root.join(file_name);
    fs::copy(source, &dest).map_err(|e| OverlayError::Copy {
        from: source.to_path_buf(),
        to: dest.clone(),
        source: e,
    })?;

    info!("local configuration applied");
    Ok(true)
}
