//! Run settings from the command line and an optional `nuscan.toml`
//!
//! Command-line values win over the config file; the config file wins over
//! built-in defaults.
//!
//! ```toml
//! framework = "net472"
//! packages_dir = "packages"
//! concurrency = 8
//! ```

use crate::cli::AnalyzeArgs;
use crate::domain::TargetFramework;
use crate::error::{AppError, ConfigError, IoError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the analyzed directory
pub const CONFIG_FILE_NAME: &str = "nuscan.toml";

/// Projects scanned at once unless configured otherwise
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Contents of a `nuscan.toml` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub framework: Option<String>,
    /// Relative paths resolve against the analyzed directory
    #[serde(default)]
    pub packages_dir: Option<PathBuf>,
    #[serde(default)]
    pub concurrency: Option<usize>,
}

impl ConfigFile {
    /// Load `nuscan.toml` from `dir`, or defaults if there is none
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::parse(path, &content)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Parse config `content`; `path` names the file for error messages
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Fully resolved settings for one analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Canonical directory to analyze
    pub root: PathBuf,
    pub framework: TargetFramework,
    pub packages_dir: PathBuf,
    pub concurrency: usize,
}

impl Settings {
    /// Resolve settings from command-line arguments
    pub fn from_cli(args: &AnalyzeArgs) -> Result<Self, AppError> {
        if !args.directory.is_dir() {
            if let Some(value) = framework_in_directory_position(args) {
                return Err(ConfigError::FrameworkAsDirectory { value }.into());
            }
            return Err(IoError::directory_not_found(&args.directory).into());
        }
        let root = args
            .directory
            .canonicalize()
            .map_err(|e| IoError::generic(&args.directory, e))?;

        let config = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::from_dir(&root)?,
        };

        Ok(Self::resolve(root, args, config)?)
    }

    /// Merge arguments over config file values for an existing `root`
    pub fn resolve(root: PathBuf, args: &AnalyzeArgs, config: ConfigFile) -> Result<Self, ConfigError> {
        let framework_text = args
            .framework
            .clone()
            .or(config.framework)
            .ok_or(ConfigError::MissingFramework)?;
        let framework: TargetFramework = framework_text.parse()?;

        let packages_dir = match (&args.packages_dir, config.packages_dir) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) if dir.is_relative() => root.join(dir),
            (None, Some(dir)) => dir,
            (None, None) => root.join("packages"),
        };

        let concurrency = args
            .concurrency
            .or(config.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency { value: concurrency });
        }

        Ok(Self {
            root,
            framework,
            packages_dir,
            concurrency,
        })
    }
}

/// The directory argument, when it is really a framework name given alone
fn framework_in_directory_position(args: &AnalyzeArgs) -> Option<String> {
    if args.framework.is_some() {
        return None;
    }
    let text = args.directory.to_str()?;
    TargetFramework::parse(text).map(|_| text.to_string())
}
