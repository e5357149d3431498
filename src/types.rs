/*!
 * Core types and data structures for repo-flattener
 */

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

use crate::bail;
use crate::error::Result;

/// A slash-separated path to a file below the repository root
///
/// Never absolute and never contains a `..` segment, so joining it onto the
/// root always stays inside the root. Equality and ordering use the
/// normalized form; the spelling it was parsed from is kept for headers.
#[derive(Debug, Clone)]
pub struct RelativePath {
    normalized: String,
    given: String,
}

impl RelativePath {
    /// Parse a user-supplied path, dropping `.` and empty segments
    ///
    /// `\` is a separator on Windows only. Elsewhere it is an ordinary file
    /// name character.
    pub fn parse(raw: &str) -> Result<Self> {
        let unified = if cfg!(windows) {
            raw.replace('\\', "/")
        } else {
            raw.to_string()
        };
        if unified.starts_with('/') || Path::new(raw).is_absolute() || has_drive_prefix(&unified) {
            bail!(Security, "absolute path not allowed: {}", raw);
        }

        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => continue,
                ".." => bail!(Security, "path traversal not allowed: {}", raw),
                other => segments.push(other),
            }
        }

        if segments.is_empty() {
            bail!(Security, "empty path: {:?}", raw);
        }

        Ok(Self {
            normalized: segments.join("/"),
            given: raw.to_string(),
        })
    }

    /// Build from a path already known to lie below the root
    pub(crate) fn from_relative(path: &Path) -> Self {
        let segments: Vec<String> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        let normalized = segments.join("/");
        Self {
            given: normalized.clone(),
            normalized,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// The path as it was spelled by the caller
    pub fn as_given(&self) -> &str {
        &self.given
    }

    /// Path segments, directories first, file name last
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.normalized.split('/')
    }

    /// Last segment
    pub fn file_name(&self) -> &str {
        self.normalized.rsplit('/').next().unwrap_or(&self.normalized)
    }

    /// Resolve against a root directory
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.segments().fold(root.to_path_buf(), |acc, s| acc.join(s))
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/')
}

impl PartialEq for RelativePath {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for RelativePath {}

impl PartialOrd for RelativePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RelativePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl Hash for RelativePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.normalized
    }
}

/// A file that could not be flattened
#[derive(Debug, Clone)]
pub struct FileFailure {
    /// Path of the failing file relative to the root
    pub path: RelativePath,
    /// Human readable cause
    pub reason: String,
}

/// Outcome of a flatten run
#[derive(Debug, Clone)]
pub struct FlattenReport {
    /// Number of files written to the output directory
    pub success_count: usize,
    /// Number of files skipped because of an error
    pub failure_count: usize,
    /// Absolute path of the written manifest
    pub manifest_path: PathBuf,
    /// Details for every skipped file, in input order
    pub failures: Vec<FileFailure>,
    /// Bytes read from the source files that were written
    pub bytes_processed: u64,
}
