mod observability;

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use skyhook_core::config::Config;
use skyhook_run::{SuperviseError, Supervisor};
use skyhook_sync::{extract, fetch, overlay, staging};

/// Pause after an attempted overlay before launching, letting the copy
/// settle on disk.
const OVERLAY_SETTLE: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        "skyhook auto-sync and launch starting"
    );

    // The credential check happens here, before any network call.
    let cfg = Config::from_env().context("Invalid configuration")?;

    staging::prepare(&cfg.staging_dir).context("Failed to prepare the staging directory")?;

    let archive = fetch::fetch(&cfg)
        .await
        .context("Failed to download the bundle")?;

    let bundle_root = extract::extract(&archive, &cfg.staging_dir, &cfg.target_dir)
        .context("Failed to extract the bundle")?;

    match overlay::overlay(&cfg.overlay_source, &bundle_root, &cfg.overlay_file) {
        Ok(true) => tokio::time::sleep(OVERLAY_SETTLE).await,
        Ok(false) => {}
        Err(err) => {
            // Non-fatal: launch with the bundled configuration; the operator
            // can fix the overlay before the next run.
            warn!(error = %err, "failed to apply local configuration");
            tokio::time::sleep(OVERLAY_SETTLE).await;
        }
    }

    let supervisor = Supervisor::new(bundle_root, cfg.runner, cfg.entry_point);
    match supervisor.run().await {
        Err(err @ SuperviseError::MissingEntryPoint { .. }) => {
            Err(anyhow::Error::new(err).context("Supervisor halted"))
        }
        Err(err) => {
            error!(error = %err, "bundle supervision stopped, not relaunching");
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}
