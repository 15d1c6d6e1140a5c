use thiserror::Error;

/// Validation is the only error surface the core exposes: persistence
/// failures are logged and tolerated, and pipeline failures degrade to the
/// original image rather than failing the submission.
#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Garment image must not be empty")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, WardrobeError>;
