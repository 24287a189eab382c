#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),

    #[error("Failed to parse config at line {0}: {1}")]
    Parse(usize, String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
