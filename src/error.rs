use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// Upstream acquisition failures. Recoverable: the session stops and the
/// caller decides whether to restart.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open landmark input {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read landmark frame")]
    Read(#[from] io::Error),
    #[error("malformed landmark frame on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: expected 21 landmarks, got {got}")]
    LandmarkCount { line: usize, got: usize },
}

/// Key injection failures. Never retried; surfaced as fatal.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to write key event")]
    Io(#[from] io::Error),
    #[error("failed to spawn key injector `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("key injector `{program}` exited with {status}")]
    Status { program: String, status: ExitStatus },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("frame acquisition failed")]
    Source(#[from] SourceError),
    #[error("action dispatch failed")]
    Dispatch(#[from] DispatchError),
}

impl PipelineError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Dispatch(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
