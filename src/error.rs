use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("could not create '{}': {source}", .path.display())]
    ArtifactCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not traverse '{}': {source}", .path.display())]
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },

    // Rendered inline in the artifact after "Error reading file: ", so no path prefix.
    #[error("{source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("could not load config '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl DumpError {
    pub fn kind(&self) -> &'static str {
        match self {
            DumpError::ArtifactCreation { .. } => "artifact-creation",
            DumpError::Traversal { .. } => "traversal",
            DumpError::FileRead { .. } => "file-read",
            DumpError::Write { .. } => "write",
            DumpError::Pattern { .. } => "pattern",
            DumpError::Config { .. } => "config",
        }
    }
}
