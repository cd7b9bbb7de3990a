use std::path::PathBuf;

use thiserror::Error;

use crate::session::ScanKey;

pub type Result<T> = std::result::Result<T, PathsError>;

#[derive(Error, Debug)]
pub enum PathsError {
    #[error("no volume root data directories configured")]
    MissingRootConfig,

    #[error("session directory {} not found under any configured volume root", .relative.display())]
    PathNotFound { relative: PathBuf },

    #[error("no tiff file found in {}", .session_dir.display())]
    NoTiffFileFound { session_dir: PathBuf },

    #[error("no session directory registered for {key}")]
    UnknownScanKey { key: ScanKey },

    #[error("invalid glob pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
