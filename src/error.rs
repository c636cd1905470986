//! Library error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the durable per-user store
///
/// Container operations themselves never fail; capacity overflow, unknown
/// keys and duplicate inserts are reported as `false`/`None`. Only the file
/// layer underneath them can error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Write {
            path: path.into(),
            source,
        }
    }
}
