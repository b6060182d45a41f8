/// CLI error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sync state error: {0}")]
    State(String),

    #[error(transparent)]
    Options(#[from] plexsync_engine::ConfigError),
}

pub type Result<T> = std::result::Result<T, CliError>;
