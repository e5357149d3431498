/*!
 * Directory scanning and exclusion rules
 */

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{FlattenError, RepositoryProblem, Result};
use crate::types::RelativePath;

/// Directory names that are never descended into
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache",
    ".idea",
    ".vscode",
    "venv",
    "env",
    ".env",
];

/// File name suffixes that are never collected
pub const DEFAULT_IGNORE_EXTS: &[&str] = &[
    ".pyc", ".class", ".o", ".so", ".dll", ".exe", ".jar", ".war",
];

/// Directory-name and file-suffix exclusions
///
/// Always contains the built-in defaults; extra rules only add to them.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    dirs: BTreeSet<String>,
    exts: BTreeSet<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            exts: DEFAULT_IGNORE_EXTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExclusionRules {
    /// Built-in defaults extended with caller-supplied names and suffixes
    pub fn with_extra<D, E>(extra_dirs: D, extra_exts: E) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let mut rules = Self::default();
        rules.dirs.extend(
            extra_dirs
                .into_iter()
                .map(|d| d.as_ref().trim().to_string())
                .filter(|d| !d.is_empty()),
        );
        rules.exts.extend(
            extra_exts
                .into_iter()
                .map(|e| e.as_ref().trim().to_string())
                .filter(|e| !e.is_empty()),
        );
        rules
    }

    /// Whether a directory with this basename is pruned
    pub fn ignores_dir(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }

    /// Whether a file with this name is skipped (plain suffix match)
    pub fn ignores_file(&self, name: &str) -> bool {
        self.exts.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Check that `root` exists, is a directory and can be listed
pub fn validate_repository(root: &Path) -> Result<()> {
    let invalid = |problem| FlattenError::InvalidRepository {
        path: root.to_path_buf(),
        problem,
    };

    let metadata = fs::metadata(root).map_err(|_| invalid(RepositoryProblem::Missing))?;
    if !metadata.is_dir() {
        return Err(invalid(RepositoryProblem::NotADirectory));
    }
    fs::read_dir(root).map_err(|_| invalid(RepositoryProblem::Unreadable))?;
    Ok(())
}

/// Scanner for repository contents
pub struct Scanner {
    /// Repository root
    root: PathBuf,
    /// Exclusion rules in effect
    rules: ExclusionRules,
    /// Follow symbolic links
    follow_symlinks: bool,
    /// Directory never descended into (typically the output directory)
    excluded_dir: Option<PathBuf>,
}

impl Scanner {
    /// Create a new scanner with the default exclusion rules
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            rules: ExclusionRules::default(),
            follow_symlinks: false,
            excluded_dir: None,
        }
    }

    pub fn with_rules(mut self, rules: ExclusionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Skip this directory if it shows up inside the root. Only takes effect
    /// when the directory already exists.
    pub fn exclude_dir(mut self, dir: &Path) -> Self {
        self.excluded_dir = fs::canonicalize(dir).ok();
        self
    }

    /// Walk the root and return the sorted relative paths of all kept files
    pub fn scan(&self) -> Result<Vec<RelativePath>> {
        validate_repository(&self.root)?;
        let root = fs::canonicalize(&self.root)?;
        info!("Scanning repository: {}", root.display());

        let walker = WalkDir::new(&root)
            .follow_links(self.follow_symlinks)
            .into_iter()
            .filter_entry(|e| !self.should_prune(e));

        let mut paths = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                // Only reached when links are not followed
                debug!("Skipping symlink: {}", entry.path().display());
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.should_ignore(&name) {
                debug!("Ignoring file: {}", entry.path().display());
                continue;
            }

            if let Ok(rel) = entry.path().strip_prefix(&root) {
                paths.push(RelativePath::from_relative(rel));
            }
        }

        paths.sort();
        info!("Found {} files", paths.len());
        Ok(paths)
    }

    /// Check if a file should be ignored based on its name
    pub fn should_ignore(&self, file_name: &str) -> bool {
        self.rules.ignores_file(file_name)
    }

    /// Directories pruned before descending
    fn should_prune(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if self.rules.ignores_dir(&name) {
            debug!("Pruning directory: {}", entry.path().display());
            return true;
        }

        match &self.excluded_dir {
            Some(excluded) => entry.path() == excluded,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_rule_is_suffix_match() {
        let rules = ExclusionRules::with_extra(Vec::<String>::new(), [".gz"]);
        assert!(rules.ignores_file("archive.tar.gz"));
        assert!(rules.ignores_file("main.o"));
        assert!(!rules.ignores_file("main.go"));
        assert!(!rules.ignores_file("photo"));
    }

    #[test]
    fn test_extra_rules_extend_defaults() {
        let rules = ExclusionRules::with_extra(["build", " dist ", ""], [".log"]);
        for dir in DEFAULT_IGNORE_DIRS {
            assert!(rules.ignores_dir(dir));
        }
        assert!(rules.ignores_dir("build"));
        assert!(rules.ignores_dir("dist"));
        assert!(!rules.ignores_dir(""));
        assert!(rules.ignores_file("debug.log"));
        assert!(rules.ignores_file("Foo.class"));

        // defaults untouched by the merge
        let fresh = ExclusionRules::default();
        assert!(!fresh.ignores_dir("build"));
        assert!(!fresh.ignores_file("debug.log"));
    }

    #[test]
    fn test_dir_rule_matches_whole_basename() {
        let rules = ExclusionRules::default();
        assert!(rules.ignores_dir("env"));
        assert!(!rules.ignores_dir("environment"));
        assert!(!rules.ignores_dir("__pycache__"));
    }
}
