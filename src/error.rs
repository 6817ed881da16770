//! Error types for the benchmark kernels
//!
//! Every kernel reports failure through [`BenchError`] instead of a sentinel
//! value, so a failed stage can never be mistaken for a valid result.

use std::path::PathBuf;
use thiserror::Error;

/// Kernel failures. Each one is local to a single stage.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Allocation failed for {what} ({elements} elements)")]
    Allocation { what: &'static str, elements: usize },

    #[error("Failed to open {} for writing: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write image data to {}: {source}", .path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Reserve exactly `len` elements, mapping allocator refusal to [`BenchError::Allocation`].
pub(crate) fn try_alloc<T: Clone>(
    what: &'static str,
    len: usize,
    fill: T,
) -> Result<Vec<T>, BenchError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| BenchError::Allocation {
            what,
            elements: len,
        })?;
    buf.resize(len, fill);
    Ok(buf)
}
