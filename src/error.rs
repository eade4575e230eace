use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HwError {
    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("option {option} needs {expected} parameter(s)")]
    MissingParam { option: String, expected: usize },

    #[error("invalid value {value:?} for {option}")]
    InvalidValue { option: String, value: String },

    /// A value parsed fine but failed the option's range check.
    #[error("value {value} rejected for {option}")]
    Rejected { option: String, value: i64 },

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

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("soundfont {path}: {reason}")]
    Soundfont { path: PathBuf, reason: String },

    #[error("device error: {0}")]
    Device(#[from] std::io::Error),
}

pub type HwResult<T> = Result<T, HwError>;
