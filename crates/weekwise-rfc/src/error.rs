use thiserror::Error;

/// RFC serialization and validation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Encode error: {0}")]
    EncodeError(String),

    #[error(transparent)]
    CoreError(#[from] weekwise_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
