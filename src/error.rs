//! Error types for the sniffer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while acquiring the TUN device.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Cannot open TUN device {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Could not configure TUN interface '{name}': {source}")]
    Configure {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("TUN devices are not supported on this platform")]
    Unsupported,
}

/// Errors raised while preparing the output directory.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Could not resolve path {path:?}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
