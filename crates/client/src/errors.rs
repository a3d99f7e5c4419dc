use common::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status {0}: {1}")]
    Status(u16, String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Storage(#[from] CoreError),
}
