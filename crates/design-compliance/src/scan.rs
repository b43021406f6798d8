//! File scanning for validation passes.
//!
//! Walks a root depth-first in file-name order. Hidden directories,
//! `node_modules` and anything whose base name matches an exclude glob are
//! pruned whole; files are kept when their name ends with an allowed
//! extension.

use crate::constants::NODE_MODULES_DIR;
use crate::{AgentError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A subtree the scanner could not read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub path: PathBuf,
    pub message: String,
}

/// Files found under a root plus the subtrees that were skipped
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub files: Vec<PathBuf>,
    pub errors: Vec<ScanError>,
}

/// Enumerates candidate files under a root
#[derive(Debug, Clone)]
pub struct FileScanner {
    extensions: Vec<String>,
    exclude_patterns: Vec<String>,
    exclude: GlobSet,
}

impl FileScanner {
    /// Create a scanner from an extension allow-list and base-name exclude globs
    pub fn new<E, X>(extensions: E, exclude_patterns: X) -> Result<Self>
    where
        E: IntoIterator,
        E::Item: Into<String>,
        X: IntoIterator,
        X::Item: Into<String>,
    {
        let extensions: Vec<String> = extensions.into_iter().map(Into::into).collect();
        let exclude_patterns: Vec<String> = exclude_patterns.into_iter().map(Into::into).collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &exclude_patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                AgentError::Configuration(format!("Invalid exclude pattern '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }
        let exclude = builder
            .build()
            .map_err(|e| AgentError::Configuration(format!("Invalid exclude patterns: {e}")))?;

        Ok(Self {
            extensions,
            exclude_patterns,
            exclude,
        })
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Ordered list of candidate files under `root`; empty if `root` is missing
    pub fn scan(&self, root: &Path) -> Vec<PathBuf> {
        self.scan_detailed(root).files
    }

    /// Like [`scan`](Self::scan) but also reports unreadable subtrees
    pub fn scan_detailed(&self, root: &Path) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        if !root.exists() {
            debug!(root = %root.display(), "Scan root does not exist");
            return outcome;
        }

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.is_candidate(&entry) {
                        outcome.files.push(entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    warn!(path = %path.display(), error = %err, "Skipping unreadable path");
                    outcome.errors.push(ScanError {
                        path,
                        message: err.to_string(),
                    });
                }
            }
        }

        outcome
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        name.starts_with('.')
            || name == NODE_MODULES_DIR
            || self.exclude.is_match(entry.file_name())
    }

    fn is_candidate(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
            && !self.exclude.is_match(entry.file_name())
    }
}
