/// Errors surfaced by the remote-store access layer.
///
/// Remote failures are propagated verbatim after being logged at the call
/// site; there is no retry, backoff, or partial-failure recovery.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote store returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no row in {table} with id {id}")]
    NotFound { table: String, id: String },
    #[error("failed to decode row: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("remote procedure {function} failed: {message}")]
    Rpc { function: String, message: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
