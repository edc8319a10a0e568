//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ScanError: Unreadable or malformed project, manifest or archive files
//! - VersionError: Text that is not a NuGet version
//! - ConfigError: Issues with CLI or config file settings
//! - IoError: File system operation failures
//!
//! Scan errors never abort an analysis run; they are collected and reported
//! next to the results.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Scanning related errors
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// A background scan task failed to complete
    #[error("scan task failed: {0}")]
    Task(String),
}

/// Errors raised while reading project files, manifests and package archives
#[derive(Error, Debug)]
pub enum ScanError {
    /// Failed to read a file
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML parsing error (.csproj, packages.config, .nuspec)
    #[error("failed to parse XML in {path}: {message}")]
    XmlParseError { path: PathBuf, message: String },

    /// JSON parsing error (project.assets.json)
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// Corrupt or unreadable .nupkg archive
    #[error("failed to open package archive {path}: {message}")]
    ArchiveError { path: PathBuf, message: String },
}

/// A string that is not a valid NuGet version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("invalid version '{input}'")]
    Invalid { input: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No framework on the command line or in the config file
    #[error("no target framework given: pass one on the command line or set `framework` in nuscan.toml")]
    MissingFramework,

    /// Unrecognized framework name
    #[error("invalid target framework '{value}': expected a name like 'net472', 'netstandard2.0' or 'net6.0'")]
    InvalidFramework { value: String },

    /// Concurrency must be at least one
    #[error("invalid concurrency '{value}': must be at least 1")]
    InvalidConcurrency { value: usize },

    /// Config file could not be read or parsed
    #[error("invalid config file {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// A framework name was given where the directory argument goes
    #[error("directory not found: '{value}' looks like a target framework; pass the directory first, e.g. `nuscan <COMMAND> . {value}`")]
    FrameworkAsDirectory { value: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Generic IO error
    #[error("IO error at {path}: {source}")]
    Generic {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new XmlParseError
    pub fn xml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScanError::XmlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScanError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new ArchiveError
    pub fn archive_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScanError::ArchiveError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of the file the error refers to
    pub fn path(&self) -> &PathBuf {
        match self {
            ScanError::ReadError { path, .. }
            | ScanError::XmlParseError { path, .. }
            | ScanError::JsonParseError { path, .. }
            | ScanError::ArchiveError { path, .. } => path,
        }
    }
}

impl VersionError {
    /// Creates a new Invalid error
    pub fn invalid(input: impl Into<String>) -> Self {
        VersionError::Invalid {
            input: input.into(),
        }
    }
}

impl IoError {
    /// Creates a new DirectoryNotFound error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        IoError::DirectoryNotFound { path: path.into() }
    }

    /// Creates a new Generic IO error
    pub fn generic(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Generic {
            path: path.into(),
            source,
        }
    }
}
