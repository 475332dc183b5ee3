use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("cannot enumerate {path}: {message}")]
    DirectoryAccess { path: PathBuf, message: String },

    #[error("{path} is not inside the site root {root}")]
    InvalidPath { path: PathBuf, root: PathBuf },

    #[error("remote key '{key}' is produced by both {first} and {second}")]
    DuplicateKey {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, SyncError>;
