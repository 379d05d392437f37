//! Application error types.
//!
//! Defines `AppError` for all error conditions in the crate and a `Result`
//! alias used throughout.
//!
//! Error taxonomy:
//! - `NotFound`: a root or target path is absent
//! - `InvalidTarget`: an operation was requested against a non-repository
//! - `Executor`: the git executable returned an error
//! - `InvalidUrl`: a clone URL failed validation
//! - `Config`: the configuration file is missing or malformed
//! - `Cancelled`: reserved for future cancellation support, never produced

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Path not found: {0}")]
    NotFound(String),

    #[error("Not a repository: {0}")]
    InvalidTarget(String),

    #[error("Git failed: {0}")]
    Executor(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    #[allow(dead_code)]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
