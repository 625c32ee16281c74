use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigitrackError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Ambiguous sidecar resolution: {0}")]
    AmbiguousSidecar(String),

    #[error("Malformed sidecar: {0}")]
    MalformedSidecar(String),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Cannot parse UTC offset from '{0}'")]
    OffsetParse(String),

    #[error("Invalid sampling rate: {0} (must be positive and finite)")]
    InvalidSamplingRate(f64),
}

pub type Result<T> = std::result::Result<T, DigitrackError>;
