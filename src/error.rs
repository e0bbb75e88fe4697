//! Application error types using thiserror
//!
//! Error hierarchy:
//! - UpstreamError: Issues with a single upstream version source
//! - ResolveError: Issues resolving the upstream version of a package
//! - PackageError: Issues loading a package directory
//! - ConfigError: Issues with the configuration file or CLI overrides
//! - CommandError: External program failures
//! - StepError / ActionError: Failures of individual pipeline steps

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a single upstream version provider
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The request could not be sent or the connection failed
    #[error("request error: GET {url}: {message}")]
    Request { url: String, message: String },

    /// The provider answered with a server error
    #[error("version provider error: GET {url} status {status}")]
    Provider { url: String, status: u16 },

    /// The provider has no usable version for the project
    #[error("upstream version not found: {detail}")]
    VersionNotFound { detail: String },

    /// The response body could not be decoded
    #[error("invalid response from GET {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// Several lookups of the same provider failed
    #[error("{}", join_lines(.0))]
    Joined(Vec<UpstreamError>),
}

/// Errors produced while resolving the upstream version of a package
#[derive(Error, Debug)]
pub enum ResolveError {
    /// None of the package URLs maps to a known provider
    #[error("no upstream provider found")]
    NoProvider,

    /// Every provider was queried and every one of them failed
    #[error("{}", render_provider_errors(.0))]
    AllFailed(Vec<UpstreamError>),

    /// A version override was configured but is not a valid version
    #[error("invalid version override '{value}' for {package}")]
    InvalidOverride { package: String, value: String },
}

/// Errors related to loading a package
#[derive(Error, Debug)]
pub enum PackageError {
    /// Path does not exist or is not a directory
    #[error("invalid package path: {path} {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// Directory is missing one of the package files
    #[error("not a package: {path} missing {missing}")]
    NotAPackage { path: PathBuf, missing: String },

    /// .SRCINFO lacks a required field or repeats a single-valued one
    #[error("invalid .SRCINFO: {path} missing/invalid '{field}' value")]
    InvalidSrcinfo { path: PathBuf, field: String },

    /// Reading a package file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicitly requested config file is not accessible
    #[error("invalid configuration path {path}: {source}")]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither XDG_CONFIG_HOME nor a home directory is available
    #[error("could not determine config file path")]
    UnknownPath,

    /// Config file exists but could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Version override not in NAME=VERSION form
    #[error("invalid version override: '{value}'")]
    InvalidOverride { value: String },
}

/// Errors from running an external program
#[derive(Error, Debug)]
pub enum CommandError {
    /// The program could not be started
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The program exited unsuccessfully
    #[error("{command} error ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Failure causes shared by the pipeline steps
#[derive(Error, Debug)]
pub enum StepError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{what} error: {source}")]
    Io {
        what: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected changes in the repository")]
    UnexpectedChanges,

    #[error("not on {expected} branch")]
    WrongBranch { expected: String },

    #[error("unexpected output from {command}: {output:?}")]
    UnexpectedOutput { command: String, output: String },
}

/// Error carried by a failed action result
#[derive(Error, Debug)]
pub enum ActionError {
    #[error(transparent)]
    Check(#[from] ResolveError),

    #[error("bump action error: {0}")]
    Bump(#[source] StepError),

    #[error("make action error: {0}")]
    Make(#[source] StepError),

    #[error("commit action error: {0}")]
    Commit(#[source] StepError),

    #[error("push action error: {0}")]
    Push(#[source] StepError),
}

fn join_lines(errors: &[UpstreamError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_provider_errors(errors: &[UpstreamError]) -> String {
    errors
        .iter()
        .map(|e| format!("upstream provider error: {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl UpstreamError {
    /// Creates a new Request error
    pub fn request(url: impl Into<String>, message: impl Into<String>) -> Self {
        UpstreamError::Request {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new VersionNotFound error
    pub fn not_found(detail: impl Into<String>) -> Self {
        UpstreamError::VersionNotFound {
            detail: detail.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        UpstreamError::InvalidResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Whether a fallback lookup may still find a version
    pub fn is_not_found(&self) -> bool {
        matches!(self, UpstreamError::VersionNotFound { .. })
    }
}

impl PackageError {
    /// Creates a new InvalidPath error
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PackageError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new NotAPackage error
    pub fn not_a_package(path: impl Into<PathBuf>, missing: impl Into<String>) -> Self {
        PackageError::NotAPackage {
            path: path.into(),
            missing: missing.into(),
        }
    }

    /// Creates a new InvalidSrcinfo error
    pub fn invalid_srcinfo(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        PackageError::InvalidSrcinfo {
            path: path.into(),
            field: field.into(),
        }
    }

    /// Creates a new Io error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PackageError::Io {
            path: path.into(),
            source,
        }
    }
}

impl StepError {
    /// Creates a new Io error
    pub fn io(what: impl Into<String>, source: std::io::Error) -> Self {
        StepError::Io {
            what: what.into(),
            source,
        }
    }
}
