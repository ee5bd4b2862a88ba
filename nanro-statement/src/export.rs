//! File names and file output for rendered statements.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{StatementError, StatementResult};
use crate::period::StatementPeriod;
use crate::render::StatementFormat;

/// `<epoch-ms>_Nanro_Statement_<start>_to_<end>.<ext>`
pub fn suggested_filename(period: &StatementPeriod, format: StatementFormat, epoch_ms: i64) -> String {
    format!(
        "{}_Nanro_Statement_{}_to_{}.{}",
        epoch_ms,
        period.start.format("%Y-%m-%d"),
        period.end.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Write `content` into `dir` under `filename`, creating `dir` if needed.
pub async fn export_statement(dir: &Path, filename: &str, content: &str) -> StatementResult<PathBuf> {
    let path = dir.join(filename);
    let write_err = |source| StatementError::Write {
        path: path.display().to_string(),
        source,
    };

    tokio::fs::create_dir_all(dir).await.map_err(write_err)?;
    tokio::fs::write(&path, content).await.map_err(write_err)?;
    info!(path = %path.display(), bytes = content.len(), "statement written");
    Ok(path)
}
