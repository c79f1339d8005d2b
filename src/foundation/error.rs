/// Convenience result type used across quadfit.
pub type QuadfitResult<T> = Result<T, QuadfitError>;

/// Error taxonomy for the fallible edges of the crate (decoding, config, IO).
///
/// Rendering and pointer handling never return errors; they degrade visually instead.
#[derive(thiserror::Error, Debug)]
pub enum QuadfitError {
    /// Invalid user-provided data (quad literals, canvas sizes, config values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while decoding or preparing bitmaps.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuadfitError {
    /// Build a [`QuadfitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`QuadfitError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`QuadfitError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
