//! Error types for installing the access control plugin.

use sqlguard_engine::BootstrapError;
use thiserror::Error;

/// Errors that abort plugin startup.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("no access control implementation registered as '{0}'")]
    UnknownImplementation(String),

    #[error("access control is already installed")]
    AlreadyInstalled,

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

/// Errors from access control configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read access control config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse access control TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
