use thiserror::Error;

/// Errors produced when parsing foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}
