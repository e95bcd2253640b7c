use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpliftError {
    #[error("cannot read project configuration: {0}")]
    ConfigRead(String),

    #[error("cannot automatically upgrade this project type: {hosting}/{language}")]
    UnsupportedTarget { hosting: String, language: String },

    #[error("path already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("another migration is already running for {0}")]
    Locked(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UpliftError>;
