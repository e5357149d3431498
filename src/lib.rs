/*!
 * Repo Flattener - Convert a repository into flat, path-prefixed files
 *
 * Every kept text file of a repository is copied into one output directory
 * under a name derived from its original path, with a `// FILE: <path>`
 * header, next to a manifest describing the original tree. The result can be
 * bulk-uploaded to systems that know nothing about directories.
 */

pub mod config;
pub mod error;
pub mod flattener;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod selection;
pub mod stats;
pub mod types;


// Re-export main components for easier access
pub use config::{Args, Config};
pub use error::{FlattenError, Result};
pub use flattener::{output_file_name, sanitize_filename, Flattener};
pub use manifest::{build_manifest, TreeNode, MANIFEST_FILE_NAME};
pub use pipeline::{collect_paths, process_repository};
pub use scanner::{ExclusionRules, Scanner, DEFAULT_IGNORE_DIRS, DEFAULT_IGNORE_EXTS};
pub use selection::{select, SelectionOutcome};
pub use types::{FileFailure, FlattenReport, RelativePath};
