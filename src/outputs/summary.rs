//! Plain-text summary file.

use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Write `summary` to `path`, replacing any previous file.
#[instrument(level = "info", skip(summary), fields(path = %path.display()))]
pub async fn write_summary_file(path: &Path, summary: &str) -> std::io::Result<()> {
    fs::write(path, summary).await?;
    info!(bytes = summary.len(), "Wrote summary file");
    Ok(())
}
