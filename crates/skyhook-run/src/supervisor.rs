//! The restart loop.
//!
//! States: STARTING (entry-point check, spawn) -> RUNNING (wait on the
//! child) -> EXITED (record code, backoff) -> STARTING, forever. The loop
//! only ends on the two conditions a relaunch cannot heal: a missing entry
//! point and a spawn failure.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::sleep;
use tracing::{info, warn};

/// Fixed delay between a child exit and the next launch attempt. Constant,
/// never exponential.
pub const RESTART_BACKOFF: Duration = Duration::from_secs(5);

/// Environment marker the bundle is launched with.
const PRODUCTION_MARKER: (&str, &str) = ("NODE_ENV", "production");

#[derive(Debug, Error)]
pub enum SuperviseError {
    /// Restarting cannot heal this: nothing re-fetches the bundle once the
    /// loop is running, so an absent entry point stays absent.
    #[error("entry point {} not found, unable to start the bundle", path.display())]
    MissingEntryPoint { path: PathBuf },

    /// Spawn failures (runner not installed, permissions) are not retried:
    /// unlike a child exit they indicate a non-transient environment
    /// problem.
    #[error("failed to launch the bundle with '{runner}'")]
    Spawn {
        runner: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait on the bundle process")]
    Wait {
        #[source]
        source: io::Error,
    },
}

/// Owns the one supervised child. No other component reads or signals it.
pub struct Supervisor {
    bundle_dir: PathBuf,
    runner: String,
    entry_point: String,
    backoff: Duration,
}

impl Supervisor {
    pub fn new(bundle_dir: PathBuf, runner: String, entry_point: String) -> Self {
        Self {
            bundle_dir,
            runner,
            entry_point,
            backoff: RESTART_BACKOFF,
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Run the supervision loop. Does not return under normal operation.
    pub async fn run(&self) -> Result<(), SuperviseError> {
        loop {
            let entry = self.bundle_dir.join(&self.entry_point);
            if !entry.exists() {
                return Err(SuperviseError::MissingEntryPoint { path: entry });
            }

            info!(runner = %self.runner, entry = %self.entry_point, "starting bundle");

            // Stdio stays inherited so operators watch the child's console
            // directly on the supervisor's own terminal.
            let mut child = Command::new(&self.runner)
                .arg(&self.entry_point)
                .current_dir(&self.bundle_dir)
                .env(PRODUCTION_MARKER.0, PRODUCTION_MARKER.1)
                .spawn()
                .map_err(|source| SuperviseError::Spawn {
                    runner: self.runner.clone(),
                    source,
                })?;

            if let Some(pid) = child.id() {
                info!(pid, "bundle running");
            }

            let status = child
                .wait()
                .await
                .map_err(|source| SuperviseError::Wait { source })?;

            warn!(
                exit_code = ?status.code(),
                backoff_secs = self.backoff.as_secs(),
                "bundle stopped, restarting after backoff"
            );
            sleep(self.backoff).await;
        }
    }
}
