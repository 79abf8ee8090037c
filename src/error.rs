use thiserror::Error;

/// Main error type for ks-window
#[derive(Error, Debug)]
pub enum KsError {
    #[error("Invalid window option '{0}': expected [!]<size>")]
    InvalidWindowOption(String),

    #[error("Window size {size} exceeds maximum of {max}")]
    WindowOutOfRange { size: u32, max: u16 },

    #[error("Unknown rule keyword: {0}")]
    UnknownKeyword(String),

    #[error("Rule keyword '{0}' is disabled")]
    DisabledKeyword(String),

    #[error("Duplicate SID: {0}")]
    DuplicateSid(u32),

    #[error("Rule parsing error: {0}")]
    RuleParseError(String),

    #[error("Packet decode error: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for ks-window operations
pub type Result<T> = std::result::Result<T, KsError>;
