//! JSON export of the run summary.
//!
//! Optional: only written when a summary path is configured. Useful for a
//! CI job that wants to alert when a school's site stops answering.

use crate::error::Result;
use crate::models::RunSummary;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `summary` as pretty-printed JSON to `path`, creating parent
/// directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_summary(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create summary dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!("Wrote run summary");
    Ok(())
}
