use rst_common::with_errors::thiserror::{self, Error};

#[derive(Debug, PartialEq, Error)]
pub enum CommonError {
    #[error("db error: {0}")]
    DbError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("config error: {0}")]
    ConfigError(String),
}

pub trait ToValidate {
    fn validate(&self) -> Result<(), CommonError>;
}
