use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::DumpConfig;
use crate::error::DumpError;
use crate::models::ExcludePatterns;
use crate::utils::is_same_file;

pub struct WalkOptions {
    pub follow_links: bool,
    pub sort: bool,
    pub exclude: ExcludePatterns,
    /// Canonical path that is never listed (the output artifact).
    pub skip: Option<PathBuf>,
}

impl WalkOptions {
    /// `exclude` is compiled up front so a bad pattern fails before the
    /// output is touched; only the output lookup happens here.
    pub fn from_config(config: &DumpConfig, exclude: ExcludePatterns) -> Self {
        let skip = if config.include_output {
            None
        } else {
            // Nothing to skip when the artifact does not exist yet.
            config.output.canonicalize().ok()
        };

        Self {
            follow_links: config.follow_links,
            sort: config.sort,
            exclude,
            skip,
        }
    }
}

/// Recursively lists every non-directory entry under `root`.
///
/// Directories matching an exclude pattern are pruned, not descended.
/// Unreadable entries below the root are skipped; only a failure on the root
/// itself is returned.
pub fn find_files(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>, DumpError> {
    let mut walker = WalkDir::new(root).follow_links(options.follow_links);
    if options.sort {
        walker = walker.sort_by_file_name();
    }

    let entries = walker.into_iter().filter_entry(|entry| {
        if entry.depth() > 0 && options.exclude.is_match(entry.path()) {
            debug!(path = %entry.path().display(), "excluded by pattern");
            return false;
        }
        true
    });

    let mut files = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(DumpError::Traversal {
                    path: root.to_path_buf(),
                    source: err,
                });
            }
            Err(err) => {
                debug!(error = %err, "skipping entry");
                continue;
            }
        };

        if !is_listed(&entry) {
            continue;
        }
        if let Some(skip) = &options.skip
            && is_same_file(entry.path(), skip)
        {
            debug!(path = %entry.path().display(), "skipping output file");
            continue;
        }

        files.push(entry.into_path());
    }

    Ok(files)
}

// Symlinks to directories are neither listed nor descended; any other
// symlink, dangling ones included, counts as a file.
fn is_listed(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_dir() {
        return false;
    }
    if file_type.is_symlink() {
        return !entry.path().is_dir();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn no_patterns() -> ExcludePatterns {
        ExcludePatterns::new(&[]).unwrap()
    }

    fn options() -> WalkOptions {
        WalkOptions {
            follow_links: false,
            sort: true,
            exclude: no_patterns(),
            skip: None,
        }
    }

    #[test]
    fn test_flat_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.txt", "b.rs", "c.md", ".hidden"] {
            fs::write(dir.path().join(name), name).unwrap();
        }

        let files = find_files(dir.path(), &options()).unwrap();
        assert_eq!(files.len(), 4);
        let unique: HashSet<_> = files.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_nested_tree_is_complete() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/io")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("top.txt"), "").unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();
        fs::write(root.join("src/io/output.rs"), "").unwrap();

        let files: HashSet<PathBuf> = find_files(root, &options()).unwrap().into_iter().collect();
        let expected: HashSet<PathBuf> = ["top.txt", "src/main.rs", "src/io/output.rs"]
            .iter()
            .map(|p| root.join(p))
            .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn test_sorted_paths_keep_root_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();

        let files = find_files(dir.path(), &options()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_files(dir.path(), &options()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_traversal_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_files(&dir.path().join("nope"), &options()).unwrap_err();
        assert_eq!(err.kind(), "traversal");
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        fs::write(dir.path().join("target/debug/app"), "").unwrap();
        fs::write(dir.path().join("Cargo.lock"), "").unwrap();
        fs::write(dir.path().join("lib.rs"), "").unwrap();

        let mut opts = options();
        opts.exclude = ExcludePatterns::new(&[r"target/debug/app$".to_string(), r"\.lock$".to_string()]).unwrap();
        let files = find_files(dir.path(), &opts).unwrap();
        assert_eq!(files, vec![dir.path().join("lib.rs")]);
    }

    #[test]
    fn test_excluded_directory_is_pruned() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        fs::write(dir.path().join("target/debug/app"), "").unwrap();
        fs::write(dir.path().join("target.rs"), "").unwrap();

        // Only the directory path itself matches; its children are dropped
        // because the walk never enters it.
        let mut opts = options();
        opts.exclude = ExcludePatterns::new(&[r"/target$".to_string()]).unwrap();
        let files = find_files(dir.path(), &opts).unwrap();
        assert_eq!(files, vec![dir.path().join("target.rs")]);
    }

    #[test]
    fn test_root_is_never_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("target");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "").unwrap();

        let mut opts = options();
        opts.exclude = ExcludePatterns::new(&[r"/target$".to_string()]).unwrap();
        assert_eq!(find_files(&root, &opts).unwrap(), vec![root.join("a.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_output_is_skipped() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::write(dir.path().join("out.txt"), "").unwrap();
        symlink(dir.path().join("out.txt"), dir.path().join("dump_link")).unwrap();

        let config = DumpConfig {
            root: dir.path().to_path_buf(),
            output: dir.path().join("out.txt"),
            sort: true,
            ..DumpConfig::default()
        };
        let opts = WalkOptions::from_config(&config, no_patterns());
        assert_eq!(find_files(&config.root, &opts).unwrap(), vec![dir.path().join("a.txt")]);
    }

    #[test]
    fn test_output_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::write(dir.path().join("out.txt"), "").unwrap();

        let config = DumpConfig {
            root: dir.path().to_path_buf(),
            output: dir.path().join("out.txt"),
            sort: true,
            ..DumpConfig::default()
        };
        let opts = WalkOptions::from_config(&config, no_patterns());
        assert_eq!(find_files(&config.root, &opts).unwrap(), vec![dir.path().join("a.txt")]);

        let config = DumpConfig { include_output: true, ..config };
        let opts = WalkOptions::from_config(&config, no_patterns());
        assert_eq!(find_files(&config.root, &opts).unwrap().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_follow_walk_semantics() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("real")).unwrap();
        fs::write(root.join("real/file.txt"), "x").unwrap();
        symlink(root.join("real"), root.join("dir_link")).unwrap();
        symlink(root.join("real/file.txt"), root.join("file_link")).unwrap();
        symlink(root.join("missing"), root.join("dangling")).unwrap();

        let files: HashSet<PathBuf> = find_files(root, &options()).unwrap().into_iter().collect();
        let expected: HashSet<PathBuf> = ["real/file.txt", "file_link", "dangling"]
            .iter()
            .map(|p| root.join(p))
            .collect();
        assert_eq!(files, expected);

        let mut opts = options();
        opts.follow_links = true;
        let followed = find_files(root, &opts).unwrap();
        assert!(followed.contains(&root.join("dir_link/file.txt")));
        assert!(!followed.contains(&root.join("dangling")));
    }
}
