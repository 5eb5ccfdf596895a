use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("schema error: {0}")]
    Schema(#[from] plural_schema::SchemaError),

    #[error("model error: {0}")]
    Model(#[from] plural_models::ModelError),

    #[error("store error: {0}")]
    Store(#[from] plural_store::StoreError),
}

pub type SdkResult<T> = Result<T, SdkError>;
