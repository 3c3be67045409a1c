use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed profile record: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no saved profile")]
    Missing,
}

pub type StoreResult<T> = Result<T, StoreError>;
