//! Error types

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to drive a digital output line
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to export GPIO pin {pin}: {source}")]
    Export {
        pin: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to configure GPIO pin {pin} as output: {source}")]
    Direction {
        pin: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
