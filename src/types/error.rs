use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("unknown falloff kind: {0}")]
    UnknownFalloff(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}
