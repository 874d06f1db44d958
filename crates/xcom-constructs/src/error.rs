use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConstructError {
    #[error("{0}")]
    ValidationError(String),
}
