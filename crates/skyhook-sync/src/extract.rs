//! Archive extraction and canonical rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("the downloaded archive cannot be unpacked")]
    Corrupt(#[source] zip::result::ZipError),

    #[error("the archive contains no top-level directory")]
    MissingRoot,

    #[error("filesystem error while extracting to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> ExtractError + '_ {
    move |source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Unpack the archive into `staging_dir`, delete the archive file, and move
/// the single top-level directory it contains to `target_dir`.
///
/// Source-hosting zipballs wrap their content in one `<owner>-<name>-<sha>`
/// directory; that wrapper is what gets renamed to the canonical target.
/// If `target_dir` already exists the rename is skipped without error: the
/// first successful extraction wins for a given run, and an existing target
/// may already be in use by a later step.
pub fn extract(
    archive_path: &Path,
    staging_dir: &Path,
    target_dir: &Path,
) -> Result<PathBuf, ExtractError> {
    let file = fs::File::open(archive_path).map_err(io_err(archive_path))?;
    let mut archive = zip::ZipArchive::new(file).map_err(ExtractError::Corrupt)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(ExtractError::Corrupt)?;
        let name = entry.name().to_string();
        // Hostile entry names never escape the staging tree.
        if name.contains("..") || name.starts_with('/') {
            debug!(entry = %name, "skipping unsafe archive entry");
            continue;
        }
        let out_path = staging_dir.join(&name);
        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(io_err(&out_path))?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).map_err(io_err(parent))?;
            }
            let mut out_file = fs::File::create(&out_path).map_err(io_err(&out_path))?;
            io::copy(&mut entry, &mut out_file).map_err(io_err(&out_path))?;
        }
    }
    drop(archive);

    // Staging must not accumulate spent archives.
    fs::remove_file(archive_path).map_err(io_err(archive_path))?;

    let extracted_root = fs::read_dir(staging_dir)
        .map_err(io_err(staging_dir))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| path.is_dir());

    if !target_dir.exists() {
        match extracted_root {
            Some(root) => {
                fs::rename(&root, target_dir).map_err(io_err(target_dir))?
            }
            None => return Err(ExtractError::MissingRoot),
        }
    } else {
        debug!(target = %target_dir.display(), "target path already present, keeping it");
    }

    info!("bundle files extracted");
    Ok(target_dir.to_path_buf())
}
