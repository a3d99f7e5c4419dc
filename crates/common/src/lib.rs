use thiserror::Error;

pub mod types;
pub mod utils;
pub mod env;
pub mod storage;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}
