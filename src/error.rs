use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The stored value table does not fit the current observation/action space.
    #[error("value table shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("value table encoding failed: {0}")]
    Encode(#[source] bincode::Error),
    #[error("value table decoding failed: {0}")]
    Decode(#[source] bincode::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
