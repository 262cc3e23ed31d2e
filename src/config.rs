use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::DumpError;

pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_OUTPUT: &str = "codebase_contents.txt";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const VERBOSE_LOG_LEVEL: &str = "debug";

#[derive(Parser, Debug)]
#[command(about = "Dump every file under a directory into a single text file")]
pub struct Args {
    /// Directory to scan
    pub root: Option<PathBuf>,

    /// Output file for the dump
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append to the output instead of truncating it first
    #[arg(short, long)]
    pub append: bool,

    /// Skip paths matching this regex (repeatable)
    #[arg(short = 'x', long = "exclude")]
    pub exclude: Vec<String>,

    /// Scan the output file too if it lives under the root
    #[arg(long)]
    pub include_output: bool,

    /// Visit entries in file-name order
    #[arg(long)]
    pub sort: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_links: bool,

    /// YAML or JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpConfig {
    pub root: PathBuf,
    pub output: PathBuf,
    pub append: bool,
    pub exclude: Vec<String>,
    pub include_output: bool,
    pub sort: bool,
    pub follow_links: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            append: false,
            exclude: Vec::new(),
            include_output: false,
            sort: false,
            follow_links: false,
        }
    }
}

impl DumpConfig {
    /// Defaults, then the config file named by `--config`, then flags.
    pub async fn from_args(args: &Args) -> Result<Self, DumpError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    pub async fn load(path: &Path) -> Result<Self, DumpError> {
        let text = fs::read_to_string(path).await.map_err(|e| DumpError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &text)
    }

    fn parse(path: &Path, text: &str) -> Result<Self, DumpError> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str::<DumpConfig>(text).map_err(|e| e.to_string())
        } else if text.trim().is_empty() {
            // serde_yaml rejects an empty document
            Ok(Self::default())
        } else {
            serde_yaml::from_str::<DumpConfig>(text).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| DumpError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(root) = &args.root {
            self.root = root.clone();
        }
        if let Some(output) = &args.output {
            self.output = output.clone();
        }
        self.append |= args.append;
        self.include_output |= args.include_output;
        self.sort |= args.sort;
        self.follow_links |= args.follow_links;
        self.exclude.extend(args.exclude.iter().cloned());
    }
}
