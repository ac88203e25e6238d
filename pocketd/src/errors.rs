use rst_common::with_errors::thiserror::{self, Error};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    IoError(String),

    #[error("stream error: {0}")]
    StreamError(String),

    #[error("pocket error: {0}")]
    PocketError(String),
}
