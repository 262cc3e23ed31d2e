use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use crate::error::DumpError;
use crate::io::input::read_record;
use crate::models::{Record, RECORD_SEPARATOR, WriteSummary};

/// Creates `path` empty, truncating whatever was there.
pub async fn create_output(path: &Path) -> Result<(), DumpError> {
    File::create(path)
        .await
        .map(|_| ())
        .map_err(|source| DumpError::ArtifactCreation {
            path: path.to_path_buf(),
            source,
        })
}

/// Appends one record per path to `output`.
///
/// Unreadable files are written with an inline error line and do not stop
/// the batch; only a failure on `output` itself is returned.
pub async fn write_records(paths: &[PathBuf], output: &Path) -> Result<WriteSummary, DumpError> {
    let write_err = |source: std::io::Error| DumpError::Write {
        path: output.to_path_buf(),
        source,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(output)
        .await
        .map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    let mut summary = WriteSummary::default();

    for path in paths {
        let record = read_record(path).await;
        if record.is_unreadable() {
            warn!(path = %path.display(), "{}", record.body_text());
            summary.unreadable += 1;
        } else {
            debug!(path = %path.display(), "appending");
        }

        summary.bytes += write_record(&mut writer, &record).await.map_err(write_err)?;
        summary.records += 1;
    }

    writer.flush().await.map_err(write_err)?;
    Ok(summary)
}

async fn write_record<W>(writer: &mut W, record: &Record) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let header = record.header();
    let body = record.body_text();
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(body.as_bytes()).await?;
    writer.write_all(RECORD_SEPARATOR.as_bytes()).await?;
    Ok((header.len() + body.len() + RECORD_SEPARATOR.len()) as u64)
}
