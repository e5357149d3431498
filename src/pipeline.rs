/*!
 * End-to-end processing of a repository
 */

use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::info;

use crate::config::Config;
use crate::ensure;
use crate::error::Result;
use crate::flattener::Flattener;
use crate::scanner::{validate_repository, Scanner};
use crate::types::{FlattenReport, RelativePath};

/// Paths a run will process: the explicit subset when one is configured,
/// otherwise the result of scanning the repository
///
/// Fails before touching the filesystem when the repository is invalid, an
/// explicit path escapes the root, or the configured file limit is exceeded.
pub fn collect_paths(config: &Config) -> Result<Vec<RelativePath>> {
    let paths = match &config.files {
        Some(files) => {
            validate_repository(&config.repo_path)?;
            files
                .iter()
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .map(RelativePath::parse)
                .collect::<Result<Vec<_>>>()?
        }
        None => Scanner::new(&config.repo_path)
            .with_rules(config.exclusion_rules())
            .follow_symlinks(config.follow_symlinks)
            .exclude_dir(&config.output_dir)
            .scan()?,
    };

    if let Some(limit) = config.max_files {
        ensure!(
            paths.len() <= limit,
            ResourceLimit,
            "found {} files, limit is {}",
            paths.len(),
            limit
        );
    }

    info!("Collected {} files", paths.len());
    Ok(paths)
}

/// Flattener configured for `config`
pub fn flattener_for(config: &Config, progress: Arc<ProgressBar>) -> Flattener {
    Flattener::new(&config.repo_path, &config.output_dir, progress).parallel(config.num_threads > 1)
}

/// Collect paths and flatten them in one go
pub fn process_repository(config: &Config, progress: Arc<ProgressBar>) -> Result<FlattenReport> {
    let paths = collect_paths(config)?;
    progress.set_length(paths.len() as u64);
    flattener_for(config, progress).flatten(&paths)
}
