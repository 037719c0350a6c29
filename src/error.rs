//! Error types and handling for the `SoftEther` vpncmd admin client

use thiserror::Error;

/// Main error type for admin operations
#[derive(Error, Debug)]
pub enum AdminError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied invalid or missing operation parameters
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// vpncmd exited with a non-zero status carrying a numeric code
    #[error("vpncmd failed with code {code}: {message}")]
    Invocation { code: u64, message: String },

    /// vpncmd failed but its message carried no numeric code
    #[error("vpncmd failed without a numeric code: {0}")]
    InvocationUnknown(String),

    /// vpncmd did not finish within the configured timeout
    #[error("vpncmd timed out: {0}")]
    Timeout(String),

    /// A byte-count field contained no digits
    #[error("Byte count has no digits: {0:?}")]
    ByteCount(String),

    /// A timestamp field did not match the fixed-width tool format
    #[error("Malformed timestamp: {0:?}")]
    Timestamp(String),

    /// A singleton lookup produced an empty record
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for admin operations
pub type Result<T> = std::result::Result<T, AdminError>;

impl AdminError {
    /// Numeric code extracted from a vpncmd failure, when one was present.
    pub fn tool_code(&self) -> Option<u64> {
        match self {
            AdminError::Invocation { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// Implement From for common error types
impl From<toml::de::Error> for AdminError {
    fn from(err: toml::de::Error) -> Self {
        AdminError::Config(format!("TOML parsing error: {err}"))
    }
}
