use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown quality flag id: {0}")]
    UnknownQualityFlag(i32),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
