use std::fmt;
use std::io;

/// Everything that can go wrong before the first frame or after the last one.
/// The per-frame simulation itself never fails.
#[derive(Debug)]
pub enum GameError {
    Config(serde_json::Error),
    InvalidConfig { field: &'static str, reason: String },
    Level { line: u64, reason: String },
    Io(io::Error),
    Csv(csv::Error),
}

impl GameError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn level(line: u64, reason: impl Into<String>) -> Self {
        Self::Level {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "malformed config: {err}"),
            Self::InvalidConfig { field, reason } => {
                write!(f, "invalid config value `{field}`: {reason}")
            }
            Self::Level { line, reason } => write!(f, "level record {line}: {reason}"),
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Csv(err) => write!(f, "csv error: {err}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::InvalidConfig { .. } | Self::Level { .. } => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}

impl From<io::Error> for GameError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for GameError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
