use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Dimension #{0} not found")]
    DimensionNotFound(usize),

    #[error("Group #{0} not found")]
    GroupNotFound(usize),

    #[error("Dimension limit reached: at most {0} dimensions per crossfilter")]
    DimensionLimit(usize),

    #[error("Arity mismatch in dimension '{0}': {1}")]
    ArityMismatch(String, String),

    #[error("View '{0}' already exists")]
    ViewExists(String),

    #[error("View '{0}' not found")]
    ViewNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, DashError>;

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
