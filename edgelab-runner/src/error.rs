//! Errors from the search runner.

use std::path::PathBuf;

use edgelab_core::engine::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("read search config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse search config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("price series is empty")]
    EmptySeries,

    #[error("parameter space: {0}")]
    Space(String),

    #[error("invalid base config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("fingerprint serialization: {0}")]
    Fingerprint(#[from] serde_json::Error),

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
