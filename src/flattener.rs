/*!
 * Flattening of repository files into a single output directory
 */

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{FlattenError, Result};
use crate::manifest;
use crate::scanner::validate_repository;
use crate::types::{FileFailure, FlattenReport, RelativePath};

/// Characters replaced by `_` in output file names
const INVALID_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Replace every character that is invalid in a file name with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if INVALID_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Output file name for a relative path, e.g. `src/main.rs` -> `src_main.rs`
pub fn output_file_name(path: &RelativePath) -> String {
    sanitize_filename(&path.as_str().replace('/', "_"))
}

/// Header line written at the top of every flattened file, naming the path
/// as it was given
pub fn file_header(path: &RelativePath) -> String {
    format!("// FILE: {}\n\n", path.as_given())
}

/// Copies repository files into a flat directory
pub struct Flattener {
    /// Repository root
    root: PathBuf,
    /// Directory receiving the flattened files
    output_dir: PathBuf,
    /// Process files on the rayon pool
    parallel: bool,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Flattener {
    /// Create a new sequential flattener
    pub fn new(root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>, progress: Arc<ProgressBar>) -> Self {
        Self {
            root: root.into(),
            output_dir: output_dir.into(),
            parallel: false,
            progress,
        }
    }

    /// Copy files on the global rayon pool instead of one by one
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Flatten `paths` into the output directory and write the manifest
    ///
    /// Fails only when the repository or output directory is unusable.
    /// Individual file errors are counted in the report. The manifest lists
    /// every input path, including the ones that failed.
    pub fn flatten(&self, paths: &[RelativePath]) -> Result<FlattenReport> {
        validate_repository(&self.root)?;
        fs::create_dir_all(&self.output_dir).map_err(|source| {
            FlattenError::OutputDirectoryUnavailable {
                path: self.output_dir.clone(),
                source,
            }
        })?;
        let output_dir = fs::canonicalize(&self.output_dir)?;

        info!(
            "Flattening {} files into {}",
            paths.len(),
            output_dir.display()
        );

        let results: Vec<Result<u64>> = if self.parallel {
            paths
                .par_iter()
                .map(|path| self.flatten_file(path, &output_dir))
                .collect()
        } else {
            paths
                .iter()
                .map(|path| self.flatten_file(path, &output_dir))
                .collect()
        };

        let mut success_count = 0;
        let mut bytes_processed = 0;
        let mut failures = Vec::new();
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(bytes) => {
                    success_count += 1;
                    bytes_processed += bytes;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", path, e);
                    failures.push(FileFailure {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let manifest_path = manifest::write_manifest(&output_dir, paths)?;
        info!("Manifest written to {}", manifest_path.display());

        Ok(FlattenReport {
            success_count,
            failure_count: failures.len(),
            manifest_path,
            failures,
            bytes_processed,
        })
    }

    /// Copy one file, returning the number of source bytes read
    fn flatten_file(&self, path: &RelativePath, output_dir: &Path) -> Result<u64> {
        self.progress.inc(1);

        let name = path.as_str();
        let display_name = if name.len() > 40 {
            let cut = name.len().saturating_sub(37);
            let cut = (cut..name.len())
                .find(|&i| name.is_char_boundary(i))
                .unwrap_or(name.len());
            format!("...{}", &name[cut..])
        } else {
            name.to_string()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));

        let source = path.to_path(&self.root);
        let to_file_error = |source| FlattenError::FileProcessing {
            path: path.to_string(),
            source,
        };

        let bytes = fs::read(&source).map_err(to_file_error)?;
        let content = String::from_utf8_lossy(&bytes);

        // Written next to the target and renamed into place, so a failed
        // write never leaves a truncated file or clobbers an earlier copy
        let target = output_dir.join(output_file_name(path));
        let write = || -> std::io::Result<()> {
            let mut staged = NamedTempFile::new_in(output_dir)?;
            {
                let mut writer = BufWriter::new(staged.as_file_mut());
                writer.write_all(file_header(path).as_bytes())?;
                writer.write_all(content.as_bytes())?;
                writer.flush()?;
            }
            staged.persist(&target).map_err(|e| e.error)?;
            Ok(())
        };
        write().map_err(to_file_error)?;

        debug!("Flattened {} -> {}", path, target.display());
        Ok(bytes.len() as u64)
    }
}
