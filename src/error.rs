use thiserror::Error;

/// Failures a command can hit. Handlers turn these into transcript lines;
/// the user-facing wording lives with each command, not here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("usage: {usage}")]
    Usage { usage: String },

    #[error("no such file or directory: {path}")]
    NotFound { path: String },

    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    #[error("is a directory: {path}")]
    IsADirectory { path: String },

    #[error("permission denied")]
    PermissionDenied,

    #[error("already exists: {path}")]
    AlreadyExists { path: String },

    #[error("invalid path")]
    InvalidPath,

    #[error("delegation failed: {0}")]
    Delegation(String),

    #[error("bad config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShellError>;

impl From<serde_json::Error> for ShellError {
    fn from(e: serde_json::Error) -> Self {
        ShellError::Config(e.to_string())
    }
}
