use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("The launcher config has no active account")]
    NoActiveAccount,

    #[error("Account `{0}` is not found")]
    AccountNotFound(String),

    #[error("Cannot start {path}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot create a tokio runtime: {0}")]
    Runtime(std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
