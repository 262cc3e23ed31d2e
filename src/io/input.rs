use std::path::Path;
use tokio::fs;

use crate::error::DumpError;
use crate::models::Record;

/// Reads `path` fully as UTF-8 text. A failure becomes an unreadable record
/// rather than an error so the batch can carry on.
pub async fn read_record(path: &Path) -> Record {
    match fs::read_to_string(path).await {
        Ok(content) => Record::content(path, content),
        Err(source) => Record::unreadable(
            path,
            DumpError::FileRead {
                path: path.to_path_buf(),
                source,
            },
        ),
    }
}
