use thiserror::Error;

/// Engine-level errors
///
/// Per-occurrence and per-group failures are demoted to
/// [`weekwise_core::Warning`] values before they reach the caller; this type
/// only travels between the internal pipeline stages.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    CoreError(#[from] weekwise_core::error::CoreError),

    #[error(transparent)]
    RfcError(#[from] weekwise_rfc::error::RfcError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
