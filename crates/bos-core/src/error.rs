// crates/bos-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file could not be parsed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Transform failed: {0}")]
    Transform(#[from] bos_parser::ParserError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid file name '{0}'")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
