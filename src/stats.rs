/*!
 * File statistics and number formatting
 */

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::types::RelativePath;

/// Bucket for files without an extension
pub const NO_EXTENSION: &str = "(no extension)";

/// Count and size of files sharing an extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionStats {
    pub count: usize,
    pub size: u64,
}

/// Aggregate statistics for a set of files
#[derive(Debug, Clone, Default)]
pub struct FileStatistics {
    /// Number of paths considered
    pub total_files: usize,
    /// Sum of the sizes of files that could be stat'ed
    pub total_size: u64,
    /// Per-extension breakdown, keyed like `.rs` or [`NO_EXTENSION`]
    pub by_extension: HashMap<String, ExtensionStats>,
}

impl FileStatistics {
    /// Extensions sorted by descending file count, ties broken by name
    pub fn extensions_by_count(&self) -> Vec<(&str, ExtensionStats)> {
        let mut exts: Vec<_> = self
            .by_extension
            .iter()
            .map(|(ext, stats)| (ext.as_str(), *stats))
            .collect();
        exts.sort_by(|(a_ext, a), (b_ext, b)| b.count.cmp(&a.count).then(a_ext.cmp(b_ext)));
        exts
    }
}

/// Extension of the last path segment, with its leading dot
pub fn extension_of(path: &RelativePath) -> String {
    match Path::new(path.file_name()).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => NO_EXTENSION.to_string(),
    }
}

/// Gather size and extension statistics for `paths` below `root`
///
/// Files that cannot be stat'ed still count towards `total_files` but add no
/// size or extension entry.
pub fn calculate_file_statistics(root: &Path, paths: &[RelativePath]) -> FileStatistics {
    let mut stats = FileStatistics {
        total_files: paths.len(),
        ..Default::default()
    };

    for path in paths {
        let Ok(metadata) = fs::metadata(path.to_path(root)) else {
            continue;
        };
        let size = metadata.len();
        stats.total_size += size;

        let entry = stats.by_extension.entry(extension_of(path)).or_default();
        entry.count += 1;
        entry.size += size;
    }

    stats
}

/// Rough token estimate, about four bytes per token for text
pub fn estimate_tokens(size: u64) -> u64 {
    size / 4
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Format a number with human-readable units
pub fn format_number(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}
