use std::{io, num::ParseFloatError, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CornerPlotError>;

#[derive(Debug, Error)]
pub enum CornerPlotError {
    #[error("At least one timestamp must be requested")]
    NoTimes,

    #[error("Invalid timestamp '{value}'")]
    InvalidTime {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Requested {requested} timestamps, but the palette only has {available} colors")]
    PaletteExhausted { requested: usize, available: usize },

    #[error("Failed to read corner file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corner file parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid corner row at line {line}: expected at least 6 fields, got {got}")]
    TooFewFields { line: u64, got: usize },

    #[error("Invalid value at line {line}, column {column}: '{value}'")]
    FieldParse {
        line: u64,
        column: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Invalid id at line {line}, column {column}: {value} has no integer value")]
    InvalidId { line: u64, column: usize, value: f64 },

    #[error("Timestamp {0} has no assigned color")]
    UnrequestedTimestamp(f64),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Viewer error: {0}")]
    Viewer(String),
}

impl From<toml::de::Error> for CornerPlotError {
    fn from(err: toml::de::Error) -> Self {
        CornerPlotError::Config(format!("TOML parse error: {}", err))
    }
}
