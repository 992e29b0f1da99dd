use thiserror::Error;

#[derive(Error, Debug)]
pub enum CensusError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {path}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to parse file: {path} - {message}")]
    ParseError { path: String, message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CensusError>;
