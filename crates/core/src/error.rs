/// Errors raised by core configuration and service wiring.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store error: {0}")]
    Store(#[from] voyamed_store::StoreError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
