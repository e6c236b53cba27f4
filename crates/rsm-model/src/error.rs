use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid lane identifier: {0:?}")]
    InvalidLane(String),
    #[error("chainage must be finite, got {0}")]
    NonFiniteChainage(f64),
}

pub type Result<T> = std::result::Result<T, ModelError>;
