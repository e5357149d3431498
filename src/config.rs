/*!
 * Configuration handling for repo-flattener
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use clap_complete::Shell;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::scanner::ExclusionRules;
use crate::{bail, ensure};

/// Config file picked up from the repository root when present
pub const CONFIG_FILE_NAME: &str = ".repo-flattener.yml";

/// Output directory used when neither the CLI nor a config file names one
pub const DEFAULT_OUTPUT_DIR: &str = "flattened_repo";

/// Command-line arguments for repo-flattener
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "repo-flattener",
    version = env!("CARGO_PKG_VERSION"),
    about = "Convert a repository into flattened files for easier uploading to LLMs",
    long_about = "Copies every text file of a repository into a single flat directory. Each copy is \
                  named after its original path and starts with a `// FILE: <path>` header, and a \
                  file_manifest.txt records the original tree.",
    after_help = "Examples:\n  \
                  repo-flattener /path/to/repository\n  \
                  repo-flattener /path/to/repository --interactive\n  \
                  repo-flattener /path/to/repository --ignore-dirs build,dist --ignore-exts .log,.tmp"
)]
pub struct Args {
    /// Path to the local repository
    #[clap(default_value = ".")]
    pub repo_path: String,

    /// Output directory for processed files [default: flattened_repo]
    #[clap(short, long)]
    pub output: Option<String>,

    /// Comma-separated list of directory names to ignore (added to the defaults)
    #[clap(long, value_delimiter = ',')]
    pub ignore_dirs: Vec<String>,

    /// Comma-separated list of file suffixes to ignore (added to the defaults)
    #[clap(long, value_delimiter = ',')]
    pub ignore_exts: Vec<String>,

    /// Comma-separated list of relative paths to process instead of scanning
    #[clap(long, value_delimiter = ',')]
    pub files: Option<Vec<String>>,

    /// Interactively select files to process
    #[clap(short, long)]
    pub interactive: bool,

    /// Follow symbolic links while scanning
    #[clap(long)]
    pub follow_symlinks: bool,

    /// Show what would be processed without writing anything
    #[clap(long)]
    pub dry_run: bool,

    /// Number of threads to use for copying files [default: 1]
    #[clap(long)]
    pub threads: Option<usize>,

    /// Abort when more than this many files would be processed
    #[clap(long)]
    pub max_files: Option<usize>,

    /// Path to a YAML config file [default: <repo>/.repo-flattener.yml]
    #[clap(long)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Settings read from a YAML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output: Option<String>,
    pub ignore_dirs: Vec<String>,
    pub ignore_exts: Vec<String>,
    pub follow_symlinks: bool,
    pub threads: Option<usize>,
    pub max_files: Option<usize>,
}

impl FileConfig {
    /// Parse a YAML config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Repository root
    pub repo_path: PathBuf,

    /// Directory receiving the flattened files
    pub output_dir: PathBuf,

    /// Extra directory names to ignore
    pub ignore_dirs: Vec<String>,

    /// Extra file suffixes to ignore
    pub ignore_exts: Vec<String>,

    /// Explicit subset of files, bypassing the scan
    pub files: Option<Vec<String>>,

    /// Follow symbolic links while scanning
    pub follow_symlinks: bool,

    /// Run the interactive selection menu
    pub interactive: bool,

    /// Only report what would be processed
    pub dry_run: bool,

    /// Number of threads to use for copying
    pub num_threads: usize,

    /// Upper bound on collected files
    pub max_files: Option<usize>,
}

impl Config {
    /// Configuration with defaults for a repository and output directory
    pub fn new(repo_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            output_dir: output_dir.into(),
            ignore_dirs: Vec::new(),
            ignore_exts: Vec::new(),
            files: None,
            follow_symlinks: false,
            interactive: false,
            dry_run: false,
            num_threads: 1,
            max_files: None,
        }
    }

    /// Create configuration from command-line arguments, merging in the
    /// config file if one is given or present in the repository
    pub fn from_args(args: Args) -> Result<Self> {
        let repo_path = PathBuf::from(&args.repo_path);

        let file_config = match &args.config {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.is_file() {
                    bail!(Config, "config file not found: {}", path.display());
                }
                debug!("Loading config file {}", path.display());
                FileConfig::load(&path)?
            }
            None => {
                let path = repo_path.join(CONFIG_FILE_NAME);
                if path.is_file() {
                    debug!("Loading config file {}", path.display());
                    FileConfig::load(&path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        Ok(Self::merge(args, file_config))
    }

    /// Combine CLI and file settings: lists are unioned, CLI scalars win,
    /// flags are OR-ed
    pub fn merge(args: Args, file: FileConfig) -> Self {
        let output_dir = args
            .output
            .or(file.output)
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        let mut ignore_dirs = file.ignore_dirs;
        ignore_dirs.extend(args.ignore_dirs);
        let mut ignore_exts = file.ignore_exts;
        ignore_exts.extend(args.ignore_exts);

        Self {
            repo_path: PathBuf::from(args.repo_path),
            output_dir: PathBuf::from(output_dir),
            ignore_dirs,
            ignore_exts,
            files: args.files,
            follow_symlinks: args.follow_symlinks || file.follow_symlinks,
            interactive: args.interactive,
            dry_run: args.dry_run,
            num_threads: args.threads.or(file.threads).unwrap_or(1),
            max_files: args.max_files.or(file.max_files),
        }
    }

    /// Exclusion rules for this run
    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::with_extra(&self.ignore_dirs, &self.ignore_exts)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(self.num_threads > 0, Config, "threads must be at least 1");
        ensure!(
            self.max_files != Some(0),
            Config,
            "max-files must be at least 1"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "repo-flattener",
            "/repo",
            "-o",
            "out",
            "--ignore-dirs",
            "build,dist",
            "--ignore-exts",
            ".log",
            "--files",
            "a.rs,src/b.rs",
            "-vv",
        ]);
        assert_eq!(args.repo_path, "/repo");
        assert_eq!(args.output.as_deref(), Some("out"));
        assert_eq!(args.ignore_dirs, ["build", "dist"]);
        assert_eq!(args.ignore_exts, [".log"]);
        assert_eq!(args.files, Some(vec!["a.rs".to_string(), "src/b.rs".to_string()]));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_defaults() {
        let config = Config::merge(Args::parse_from(["repo-flattener"]), FileConfig::default());
        assert_eq!(config.repo_path, PathBuf::from("."));
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.num_threads, 1);
        assert!(config.files.is_none());
        assert!(!config.follow_symlinks);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_cli_wins_and_lists_union() {
        let args = Args::parse_from([
            "repo-flattener",
            "--ignore-dirs",
            "dist",
            "--threads",
            "8",
        ]);
        let file: FileConfig = serde_yaml::from_str(
            "output: from_file\nignore_dirs: [build]\nignore_exts: [.tmp]\nfollow_symlinks: true\nthreads: 2\nmax_files: 10\n",
        )
        .unwrap();

        let config = Config::merge(args, file);
        assert_eq!(config.output_dir, PathBuf::from("from_file"));
        assert_eq!(config.ignore_dirs, ["build", "dist"]);
        assert_eq!(config.ignore_exts, [".tmp"]);
        assert!(config.follow_symlinks);
        assert_eq!(config.num_threads, 8);
        assert_eq!(config.max_files, Some(10));

        let rules = config.exclusion_rules();
        assert!(rules.ignores_dir("build") && rules.ignores_dir("dist") && rules.ignores_dir(".git"));
        assert!(rules.ignores_file("x.tmp") && rules.ignores_file("x.pyc"));
    }

    #[test]
    fn test_unknown_config_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "ignore_directories: [build]\n").unwrap();
        assert!(FileConfig::load(&path).is_err());
    }

    #[test]
    fn test_config_file_discovered_in_repo() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "ignore_dirs: [generated]\n").unwrap();

        let args = Args::parse_from(["repo-flattener", dir.path().to_str().unwrap()]);
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.ignore_dirs, ["generated"]);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let args = Args::parse_from(["repo-flattener", "--config", "/definitely/not/here.yml"]);
        let err = Config::from_args(args).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = Config::new(".", "out");
        config.num_threads = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new(".", "out");
        config.max_files = Some(0);
        assert!(config.validate().is_err());
    }
}
